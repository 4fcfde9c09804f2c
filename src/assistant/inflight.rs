use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Tracks the newest request per call site so stale responses can be
/// discarded when a newer request superseded them or the caller was
/// torn down. Lock-free; safe to share across tasks.
///
/// Usage: call `begin` before awaiting the network call, and check
/// `is_current` before applying the response.
#[derive(Debug, Default)]
pub struct InFlight {
    latest: AtomicU64,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding any previous one
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether a response for this token is still wanted
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Invalidate every outstanding request, e.g. when the view that
    /// issued them goes away
    pub fn cancel_all(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_request_wins() {
        let inflight = InFlight::new();

        let first = inflight.begin();
        assert!(inflight.is_current(first));

        let second = inflight.begin();
        assert!(!inflight.is_current(first));
        assert!(inflight.is_current(second));
    }

    #[test]
    fn test_cancel_all_invalidates_outstanding() {
        let inflight = InFlight::new();
        let token = inflight.begin();

        inflight.cancel_all();
        assert!(!inflight.is_current(token));
    }
}
