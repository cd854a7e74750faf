//! Handler for one client connection
// (c) 2024 Ross Younger

use std::io::ErrorKind;

use human_repr::HumanCount as _;
use tokio::io::{AsyncRead, AsyncReadExt as _, AsyncWrite};
use tracing::{debug, info, trace, warn};

use crate::protocol::{RECEIVE_BUFFER_SIZE, Request};
use crate::transfer::{TransferOutcome, send_file, send_not_found};
use crate::util::ServerRoot;

/// What happened during a session, for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SessionSummary {
    /// Requests received
    pub(crate) requests: u64,
    /// Requests answered with the whole file
    pub(crate) files_sent: u64,
    /// Requests answered with the not-found reply
    pub(crate) not_found: u64,
    /// File data sent, in bytes
    pub(crate) bytes_sent: u64,
}

/// Runs the request/reply loop for one connection until the client goes away.
///
/// The session is the only reader of `recv` and the only writer of `send`.
/// Every request gets a reply (file or not-found text), and the loop goes round again.
/// The session ends when:
/// * the client closes its side (zero-byte receive);
/// * a receive fails;
/// * a write to the client fails.
///
/// Only the last two are reported as errors. A connection reset by the client is not an error.
pub(crate) async fn handle_session<R, W>(
    mut recv: R,
    mut send: W,
    root: &ServerRoot,
) -> anyhow::Result<SessionSummary>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut summary = SessionSummary::default();
    let mut buf = [0u8; RECEIVE_BUFFER_SIZE];

    loop {
        let count = match recv.read(&mut buf).await {
            Ok(0) => {
                debug!("connection closing");
                return Ok(summary);
            }
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::ConnectionReset => {
                info!("client disconnected unexpectedly");
                return Ok(summary);
            }
            Err(e) => {
                return Err(anyhow::Error::new(e).context("receive failed"));
            }
        };
        let request = Request::decode(&buf, count);
        let filename = request.filename();
        summary.requests += 1;
        debug!("bytes received: {count}; requested file: {filename:?}");

        let outcome = match root.resolve(filename) {
            Ok(path) => {
                trace!("resolved to {}", path.display());
                send_file(&mut send, &path, filename).await
            }
            Err(e) => {
                warn!("refusing {filename:?}: {e}");
                send_not_found(&mut send, filename).await
            }
        };

        match outcome {
            TransferOutcome::Success(bytes) => {
                summary.files_sent += 1;
                summary.bytes_sent += bytes;
                info!("sent {filename:?} ({})", bytes.human_count_bytes());
            }
            TransferOutcome::FileNotFound => {
                summary.not_found += 1;
                info!("file not found: {filename:?}");
            }
            TransferOutcome::TransferIOError(e) if e.is_connection_fatal() => {
                return Err(anyhow::Error::new(e).context(format!("sending {filename:?}")));
            }
            TransferOutcome::TransferIOError(e) => {
                warn!("sending {filename:?} was cut short: {e}");
            }
        }
    }
}
