//! Request decoding
// (c) 2024 Ross Younger

use std::fmt::Display;

/// A single client request: the name of the file to send.
///
/// A request is built from the bytes returned by exactly one receive call.
/// No further parsing takes place:
/// * The name ends at the number of bytes actually read.
/// * The name also ends at the first NUL byte, if there is one.
/// * Bytes which are not valid UTF-8 are replaced with `U+FFFD`.
/// * Whitespace, path separators and line endings are kept as they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    filename: String,
}

impl Request {
    /// Decodes a request from a receive buffer and the count of bytes read into it.
    ///
    /// A count larger than the buffer is clamped to the buffer.
    #[must_use]
    pub fn decode(buffer: &[u8], count: usize) -> Self {
        let received = &buffer[..count.min(buffer.len())];
        let name = received
            .iter()
            .position(|b| *b == 0)
            .map_or(received, |nul| &received[..nul]);
        Self {
            filename: String::from_utf8_lossy(name).into_owned(),
        }
    }

    /// The requested filename, exactly as the client sent it
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

impl Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.filename)
    }
}
