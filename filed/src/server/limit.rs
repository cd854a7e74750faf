//! Concurrent session limit
// (c) 2024 Ross Younger

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Caps the number of sessions running at once.
///
/// The default is unlimited: every accepted connection gets a session straight away.
/// With a limit in place, the acceptor waits for a session to finish before it accepts
/// another connection; pending clients queue in the listen backlog.
/// The wire protocol is the same either way.
#[derive(Debug, Clone)]
pub(crate) struct ConnectionLimit(Option<Arc<Semaphore>>);

impl ConnectionLimit {
    /// Constructor. A `max` of 0 means unlimited.
    pub(crate) fn new(max: u32) -> Self {
        match max {
            0 => Self(None),
            n => Self(Some(Arc::new(Semaphore::new(n as usize)))),
        }
    }

    /// Waits for a free slot.
    ///
    /// The slot is held until the returned permit is dropped.
    /// Always returns immediately when unlimited.
    pub(crate) async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        let sem = self.0.as_ref()?;
        // The semaphore is never closed, so acquire cannot fail.
        sem.clone().acquire_owned().await.ok()
    }

    /// Number of free slots, if limited
    #[cfg(test)]
    fn available(&self) -> Option<usize> {
        self.0.as_ref().map(|s| s.available_permits())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod test {
    use std::time::Duration;

    use super::ConnectionLimit;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn unlimited() {
        let limit = ConnectionLimit::new(0);
        assert!(limit.acquire().await.is_none());
        assert_eq!(limit.available(), None);
    }

    #[tokio::test]
    async fn limited() {
        let limit = ConnectionLimit::new(2);
        let p1 = limit.acquire().await.unwrap();
        let _p2 = limit.acquire().await.unwrap();
        assert_eq!(limit.available(), Some(0));

        // a third caller has to wait...
        let waiting = tokio::time::timeout(Duration::from_millis(50), limit.acquire()).await;
        assert!(waiting.is_err());

        // ...until a slot is released
        drop(p1);
        let p3 = tokio::time::timeout(Duration::from_millis(50), limit.acquire())
            .await
            .unwrap();
        assert!(p3.is_some());
    }
}
