//! Credential gate: shared-secret authentication for the active session.
//!
//! The gate holds the configured secret and a single `authenticated` flag.
//! Authentication never survives a disconnect or reconnect; the session
//! tracker resets the gate on both events.

use tracing::{debug, warn};

use crate::config::MAX_SECRET_LEN;
use crate::error::{LeashError, Result};

/// Validates presented secrets and tracks the authenticated flag.
#[derive(Debug, Clone)]
pub struct CredentialGate {
    secret: Vec<u8>,
    authenticated: bool,
}

impl CredentialGate {
    /// Create a gate for the given secret.
    ///
    /// The secret is fixed at configuration time; oversized secrets are
    /// rejected by [`crate::config::TagConfig::validate`] before reaching
    /// this constructor, so a silent truncation guard is enough here.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut secret = secret.as_bytes().to_vec();
        secret.truncate(MAX_SECRET_LEN);
        Self {
            secret,
            authenticated: false,
        }
    }

    /// Compare `candidate` to the configured secret.
    ///
    /// An exact, case-sensitive match sets the authenticated flag. Any
    /// mismatch clears it, so a wrong guess also revokes an earlier
    /// successful authentication.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the candidate exceeds the maximum secret length
    ///   (checked before comparison).
    /// - `AuthenticationFailed` on mismatch.
    pub fn submit(&mut self, candidate: &[u8]) -> Result<()> {
        if candidate.len() > MAX_SECRET_LEN {
            return Err(LeashError::InvalidInput(format!(
                "credential exceeds maximum length of {MAX_SECRET_LEN} bytes (got {})",
                candidate.len()
            )));
        }
        if candidate == self.secret.as_slice() {
            self.authenticated = true;
            debug!("authentication pass");
            Ok(())
        } else {
            self.authenticated = false;
            warn!("authentication fail");
            Err(LeashError::AuthenticationFailed)
        }
    }

    /// Unconditionally clear the authenticated flag.
    pub fn reset(&mut self) {
        self.authenticated = false;
    }

    /// Whether a correct secret has been presented since the last reset.
    #[inline]
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_secret_authenticates() {
        let mut gate = CredentialGate::new("hello");
        assert!(!gate.is_authenticated());
        gate.submit(b"hello").unwrap();
        assert!(gate.is_authenticated());
    }

    #[test]
    fn test_wrong_secret_fails_and_clears() {
        let mut gate = CredentialGate::new("hello");
        gate.submit(b"hello").unwrap();

        let err = gate.submit(b"hullo").unwrap_err();
        assert!(matches!(err, LeashError::AuthenticationFailed));
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        let mut gate = CredentialGate::new("hello");
        assert!(gate.submit(b"Hello").is_err());
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn test_oversized_candidate_rejected_before_comparison() {
        let mut gate = CredentialGate::new("hello");
        gate.submit(b"hello").unwrap();

        // Over-length input is InvalidInput, not AuthenticationFailed, and
        // must not touch the flag.
        let err = gate.submit(&[b'x'; MAX_SECRET_LEN + 1]).unwrap_err();
        assert!(matches!(err, LeashError::InvalidInput(_)));
        assert!(gate.is_authenticated());
    }

    #[test]
    fn test_prefix_of_secret_is_a_mismatch() {
        let mut gate = CredentialGate::new("hello");
        assert!(gate.submit(b"hell").is_err());
        assert!(gate.submit(b"hello\0").is_err());
    }

    #[test]
    fn test_reset_clears_flag() {
        let mut gate = CredentialGate::new("hello");
        gate.submit(b"hello").unwrap();
        gate.reset();
        assert!(!gate.is_authenticated());
    }
}
