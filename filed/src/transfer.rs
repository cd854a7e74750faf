//! File transfer: streams a file, or the not-found reply, to a client
// (c) 2024 Ross Younger

use std::io::ErrorKind;
use std::path::Path;

use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt as _, AsyncWrite, AsyncWriteExt as _};
use tracing::{debug, trace};

use crate::protocol::{FILE_CHUNK_SIZE, not_found_message};

/// An I/O failure part way through a transfer
#[derive(Debug, Error)]
pub enum TransferError {
    /// Reading the file failed. The client has received a prefix of the file.
    #[error("reading file failed: {0}")]
    Read(std::io::Error),
    /// Writing to the client failed. The connection is no longer usable.
    #[error("sending to client failed: {0}")]
    Write(std::io::Error),
}

impl TransferError {
    /// Does this error mean the connection to the client is broken?
    #[must_use]
    pub fn is_connection_fatal(&self) -> bool {
        matches!(self, Self::Write(_))
    }
}

/// The result of serving one request
#[derive(Debug)]
pub enum TransferOutcome {
    /// The whole file was sent. This is the number of bytes sent.
    Success(u64),
    /// The file could not be opened; the not-found reply was sent.
    FileNotFound,
    /// The transfer was abandoned part way through
    TransferIOError(TransferError),
}

/// Opens a file for sending. Directories are refused.
async fn open_file(path: &Path) -> std::io::Result<File> {
    let file = File::open(path).await?;
    if file.metadata().await?.is_dir() {
        return Err(ErrorKind::IsADirectory.into());
    }
    Ok(file)
}

/// Reads until `buf` is full or the reader is exhausted.
///
/// Returns the number of bytes read; anything less than `buf.len()` means end of file.
async fn fill_chunk<R: AsyncRead + Unpin>(
    reader: &mut R,
    buf: &mut [u8],
) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]).await {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => (),
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Writes the not-found reply for `filename`
pub async fn send_not_found<W: AsyncWrite + Unpin>(
    out: &mut W,
    filename: &str,
) -> TransferOutcome {
    let message = not_found_message(filename);
    let result = async {
        out.write_all(message.as_bytes()).await?;
        out.flush().await
    }
    .await;
    match result {
        Ok(()) => TransferOutcome::FileNotFound,
        Err(e) => TransferOutcome::TransferIOError(TransferError::Write(e)),
    }
}

/// Sends the file at `path` to `out`, in chunks of [`FILE_CHUNK_SIZE`] bytes.
///
/// If the file cannot be opened, sends the not-found reply for `filename` instead.
/// `filename` is the name as the client asked for it; `path` is where it resolved to.
pub async fn send_file<W: AsyncWrite + Unpin>(
    out: &mut W,
    path: &Path,
    filename: &str,
) -> TransferOutcome {
    let file = match open_file(path).await {
        Ok(f) => f,
        Err(e) => {
            debug!("could not open {}: {e}", path.display());
            return send_not_found(out, filename).await;
        }
    };
    stream_file(file, out).await
}

/// Copies everything from `reader` to `out` in fixed-size chunks
async fn stream_file<R, W>(mut reader: R, out: &mut W) -> TransferOutcome
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = [0u8; FILE_CHUNK_SIZE];
    let mut sent = 0u64;
    loop {
        let n = match fill_chunk(&mut reader, &mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => return TransferOutcome::TransferIOError(TransferError::Read(e)),
        };
        if let Err(e) = out.write_all(&buf[..n]).await {
            return TransferOutcome::TransferIOError(TransferError::Write(e));
        }
        sent += n as u64;
        trace!("sent chunk of {n}, total {sent}");
        if n < buf.len() {
            break;
        }
    }
    if let Err(e) = out.flush().await {
        return TransferOutcome::TransferIOError(TransferError::Write(e));
    }
    TransferOutcome::Success(sent)
}
