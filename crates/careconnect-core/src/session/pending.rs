//! Busy/typing indicator with guaranteed release.

use std::sync::Arc;
use tokio::sync::watch;

/// Counts in-flight backend calls and publishes the count to subscribers.
#[derive(Debug, Clone)]
pub struct BusyIndicator {
    in_flight: Arc<watch::Sender<usize>>,
}

impl BusyIndicator {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0usize);
        Self {
            in_flight: Arc::new(tx),
        }
    }

    /// Raises the indicator until the returned guard is dropped.
    pub fn acquire(&self) -> PendingGuard {
        self.in_flight.send_modify(|count| *count += 1);
        PendingGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    pub fn in_flight(&self) -> usize {
        *self.in_flight.borrow()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.in_flight.subscribe()
    }
}

impl Default for BusyIndicator {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowers the indicator on drop, whichever way the call exits.
#[must_use = "the indicator is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct PendingGuard {
    in_flight: Arc<watch::Sender<usize>>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.in_flight
            .send_modify(|count| *count = count.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_releases_on_drop() {
        let busy = BusyIndicator::new();
        assert!(!busy.is_busy());
        {
            let _first = busy.acquire();
            let _second = busy.acquire();
            assert_eq!(busy.in_flight(), 2);
        }
        assert!(!busy.is_busy());
    }

    #[test]
    fn test_guard_releases_on_early_return() {
        fn fails(busy: &BusyIndicator) -> Result<(), &'static str> {
            let _pending = busy.acquire();
            Err("boom")
        }

        let busy = BusyIndicator::new();
        assert!(fails(&busy).is_err());
        assert_eq!(busy.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let busy = BusyIndicator::new();
        let mut rx = busy.subscribe();

        let guard = busy.acquire();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);

        drop(guard);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 0);
    }
}
