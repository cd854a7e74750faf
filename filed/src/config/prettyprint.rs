//! Configuration pretty-printing
// (c) 2024 Ross Younger

use super::Manager;
use crate::cli::styles::use_colours;

use figment::{Metadata, value::Value};
use heck::ToUpperCamelCase;
use std::{fmt::Display, sync::LazyLock};
use struct_field_names_as_array::FieldNamesAsSlice;
use tabled::{
    Table, Tabled,
    settings::{Color, Theme, object::Rows, style::Style},
};

static TABLE_STYLE: LazyLock<Theme> = LazyLock::new(|| {
    if cfg!(windows) {
        Style::psql().into()
    } else {
        Style::sharp().into()
    }
});

/// Data type used when rendering the config table
#[derive(Tabled)]
struct PrettyConfig {
    field: String,
    value: String,
    source: String,
}

impl PrettyConfig {
    fn render_source(meta: Option<&Metadata>) -> String {
        if let Some(m) = meta {
            m.source
                .as_ref()
                .map_or_else(|| m.name.to_string(), figment::Source::to_string)
        } else {
            String::new()
        }
    }

    fn render_value(value: &Value) -> String {
        match value {
            Value::String(_tag, s) if s.is_empty() => "<unset>".into(),
            Value::String(_tag, s) => s.to_string(),
            Value::Char(_tag, c) => c.to_string(),
            Value::Bool(_tag, b) => b.to_string(),
            Value::Num(_tag, num) => {
                if let Some(i) = num.to_i128() {
                    i.to_string()
                } else if let Some(u) = num.to_u128() {
                    u.to_string()
                } else if let Some(ff) = num.to_f64() {
                    ff.to_string()
                } else {
                    format!("{num:?}")
                }
            }
            Value::Empty(_tag, _) => "<empty>".into(),
            // no configuration field is a dictionary
            Value::Dict(_tag, dict) => format!("{{{} entries}}", dict.len()),
            Value::Array(_tag, vec) => {
                format!(
                    "[{}]",
                    vec.iter()
                        .map(PrettyConfig::render_value)
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
        }
    }

    fn new<F: Into<String>>(field: F, value: &Value, meta: Option<&Metadata>) -> Self {
        Self {
            field: field.into(),
            value: PrettyConfig::render_value(value),
            source: PrettyConfig::render_source(meta),
        }
    }
}

/// Pretty-printing type wrapper to Manager
#[derive(Debug, Clone, Copy)]
pub struct DisplayAdapter<'a> {
    /// Data source
    source: &'a Manager,
    /// The fields we want to output, in order
    fields: &'static [&'static str],
}

impl Manager {
    /// Creates a `DisplayAdapter` for this struct, listing the fields of `T`
    ///
    /// # Returns
    /// An ephemeral structure implementing `Display`.
    #[must_use]
    pub fn to_display_adapter<T>(&self) -> DisplayAdapter<'_>
    where
        T: FieldNamesAsSlice,
    {
        DisplayAdapter {
            source: self,
            fields: T::FIELD_NAMES_AS_SLICE,
        }
    }
}

impl Display for DisplayAdapter<'_> {
    /// Formats the contents of this structure as a table showing where each value came from.
    ///
    /// N.B. This function uses CLI styling.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = &self.source.data;

        let mut output = Vec::<PrettyConfig>::new();
        for field in self.fields {
            if let Ok(value) = data.find_value(field) {
                let meta = data.get_metadata(value.tag());
                output.push(PrettyConfig::new(field.to_upper_camel_case(), &value, meta));
            }
        }
        let mut writable = Table::new(output);
        let _ = writable.with(TABLE_STYLE.clone());
        if use_colours() {
            let _ = writable.modify(Rows::first(), Color::FG_CYAN);
        }
        write!(f, "{writable}")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod test {
    use assertables::{assert_contains, assert_not_contains};

    use crate::config::{Configuration, ConfigurationOverrides, Manager};

    #[test]
    fn shows_every_field_and_its_source() {
        let mut mgr = Manager::without_env();
        mgr.merge_provider(ConfigurationOverrides {
            port: Some(1234),
            ..Default::default()
        });
        mgr.apply_system_default();
        let s = mgr.to_display_adapter::<Configuration>().to_string();
        for field in [
            "Port",
            "Address",
            "Root",
            "MaxConnections",
            "TimeFormat",
            "LogFile",
        ] {
            assert_contains!(s, field);
        }
        assert_contains!(s, "1234");
        assert_contains!(s, "command line");
        assert_contains!(s, "default");
        assert_contains!(s, "<unset>");
        assert_not_contains!(s, "27015");
    }

    #[test]
    fn environment_source() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FILED_MAX_CONNECTIONS", "7");
            let mut mgr = Manager::standard();
            mgr.apply_system_default();
            let s = mgr.to_display_adapter::<Configuration>().to_string();
            assert_contains!(s, "7");
            assert_contains!(s, "environment");
            Ok(())
        });
    }
}
