// (c) 2024 Ross Younger
//! # 📖 The filed wire protocol
//!
//! filed speaks a deliberately tiny protocol over plain TCP (default port [`DEFAULT_PORT`]).
//! There is no handshake, no TLS and no framing.
//!
//! ## Requests
//!
//! The client sends the name of the file it wants as plain bytes.
//! **Whatever arrives in one receive call is the whole request**, up to [`RECEIVE_BUFFER_SIZE`] bytes.
//! There is no length prefix and no terminator; a longer message is split at the receive boundary,
//! and the remainder is treated as the next request.
//!
//! See [`Request`] for exactly how the bytes are interpreted.
//!
//! ## Replies
//!
//! * If the file can be opened, the server sends its raw contents, written in chunks of [`FILE_CHUNK_SIZE`] bytes.
//!   Nothing follows the last chunk.
//! * If the file cannot be opened, the server sends the literal text
//!   `Error: File not found - <filename>` (see [`not_found_message`]).
//!
//! The connection stays open after either reply; the client may send another request.
//!
//! ## Caveats
//!
//! Replies are not self-delimiting. A client must either know the expected size of the file
//! out of band, or treat the connection going idle as the end of one reply before it sends the next request.
//! The not-found text can only be told apart from file content by convention.
//!
//! ## Closedown
//!
//! Either side may close the connection at any time.
//! The server closes its side when the client disconnects or a network error occurs.

mod request;
pub use request::Request;

/// The TCP port the server listens on unless configured otherwise
pub const DEFAULT_PORT: u16 = 27015;

/// The largest request the server will receive in one go
pub const RECEIVE_BUFFER_SIZE: usize = 512;

/// The size of each chunk of file data written to the client
pub const FILE_CHUNK_SIZE: usize = 1024;

/// Composes the reply sent when a requested file cannot be opened.
///
/// The wording is fixed; clients match against it.
#[must_use]
pub fn not_found_message(filename: &str) -> String {
    format!("Error: File not found - {filename}")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod test {
    use pretty_assertions::assert_eq;

    #[test]
    fn not_found_wording() {
        assert_eq!(
            super::not_found_message("missing.bin"),
            "Error: File not found - missing.bin"
        );
    }

    #[test]
    fn not_found_keeps_name_verbatim() {
        assert_eq!(
            super::not_found_message("../a b\\c"),
            "Error: File not found - ../a b\\c"
        );
    }
}
