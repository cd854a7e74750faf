//! Server root & path resolution
// (c) 2024 Ross Younger

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use thiserror::Error;

/// Why a client-supplied filename was refused
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// Nothing was asked for
    #[error("empty filename")]
    Empty,
    /// The name was absolute, or carried a drive or root prefix
    #[error("absolute paths are not served")]
    Absolute,
    /// The name tried to climb out of the server root
    #[error("parent directory components are not served")]
    ParentDir,
}

/// The directory every request is resolved against.
///
/// This is established once at startup and is read-only thereafter.
/// Cloning is cheap; all clones share the same path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRoot(Arc<Path>);

impl ServerRoot {
    /// Uses the given directory as the root
    #[must_use]
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self(Arc::from(dir.into()))
    }

    /// Uses the directory containing the running executable as the root
    pub fn from_executable() -> anyhow::Result<Self> {
        let exe = std::env::current_exe().context("could not determine path to executable")?;
        let dir = exe
            .parent()
            .with_context(|| format!("executable path {} has no parent", exe.display()))?;
        Ok(Self::new(dir))
    }

    /// Uses `dir` if it is non-empty, otherwise the executable's directory.
    ///
    /// A non-empty `dir` must exist and be a directory.
    pub fn from_config(dir: &str) -> anyhow::Result<Self> {
        if dir.is_empty() {
            return Self::from_executable();
        }
        let path = PathBuf::from(dir);
        anyhow::ensure!(path.is_dir(), "server root {dir} is not a directory");
        Ok(Self::new(path))
    }

    /// Accessor
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Maps a client-supplied filename to a path under this root.
    ///
    /// Both `/` and `\` separate components.
    /// Empty and `.` components are dropped.
    /// Names which are absolute, or which contain a `..` component, are refused;
    /// the returned path is therefore always inside the root.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, PathError> {
        if filename.is_empty() {
            return Err(PathError::Empty);
        }
        if filename.starts_with(['/', '\\']) {
            return Err(PathError::Absolute);
        }
        let mut result = self.0.to_path_buf();
        for part in filename.split(['/', '\\']) {
            for component in Path::new(part).components() {
                match component {
                    Component::Normal(c) => result.push(c),
                    Component::CurDir => (),
                    Component::ParentDir => return Err(PathError::ParentDir),
                    Component::RootDir | Component::Prefix(_) => {
                        return Err(PathError::Absolute);
                    }
                }
            }
        }
        Ok(result)
    }
}
