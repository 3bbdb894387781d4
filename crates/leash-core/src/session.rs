//! Session tracker: the single active peer connection, if any.

/// Opaque channel handle assigned by the transport on connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHandle(pub u16);

/// Tracks whether a peer is connected. At most one session at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionTracker {
    handle: Option<SessionHandle>,
}

impl SessionTracker {
    /// Create a tracker with no session.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Bind a new session. Ignored if a session already exists; the
    /// transport never delivers a second connect while one is active, so
    /// a duplicate is a stale event.
    pub fn open(&mut self, handle: SessionHandle) {
        if self.handle.is_none() {
            self.handle = Some(handle);
        }
    }

    /// Destroy the session.
    pub fn close(&mut self) {
        self.handle = None;
    }

    /// Whether a peer is currently connected.
    #[inline]
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.handle.is_some()
    }

    /// Channel handle of the active session, valid only while connected.
    #[inline]
    #[must_use]
    pub const fn handle(&self) -> Option<SessionHandle> {
        self.handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_close() {
        let mut tracker = SessionTracker::new();
        assert!(!tracker.has_session());

        tracker.open(SessionHandle(7));
        assert!(tracker.has_session());
        assert_eq!(tracker.handle(), Some(SessionHandle(7)));

        tracker.close();
        assert!(!tracker.has_session());
        assert_eq!(tracker.handle(), None);
    }

    #[test]
    fn test_second_open_is_ignored() {
        let mut tracker = SessionTracker::new();
        tracker.open(SessionHandle(1));
        tracker.open(SessionHandle(2));
        assert_eq!(tracker.handle(), Some(SessionHandle(1)));
    }
}
