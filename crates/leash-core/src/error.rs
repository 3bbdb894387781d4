//! Unified error types for the leash core library.
//!
//! Every rejected operation in the core maps to one variant here. None of
//! these are fatal: rejected attribute writes are reported back to the
//! transport layer as an attribute-protocol error code, everything else is
//! logged and the state machine continues.
//!
//! # Design Principles
//!
//! - **Specific variants**: Each error variant captures exactly one failure mode
//! - **Local handling**: Errors never propagate past the component boundary
//! - **Wire-ready**: Rejected writes carry an ATT error code for the peer

use thiserror::Error;

/// The unified error type for all leash core operations.
#[derive(Debug, Error)]
pub enum LeashError {
    // =========================================================================
    // AUTHENTICATION & AUTHORIZATION ERRORS
    // =========================================================================
    /// The presented credential did not match the configured secret.
    #[error("Authentication failed: presented credential does not match")]
    AuthenticationFailed,

    /// A protected write was attempted without prior authentication.
    #[error("Unauthorized: authenticate before writing protected attributes")]
    Unauthorized,

    // =========================================================================
    // INPUT VALIDATION ERRORS
    // =========================================================================
    /// The input was malformed (empty, oversized credential, bad payload).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A write would exceed the fixed capacity of the target field.
    #[error("Write out of range: offset {offset} + len {len} exceeds capacity {capacity}")]
    OutOfRange {
        /// Offset the peer asked to write at.
        offset: usize,
        /// Length of the chunk.
        len: usize,
        /// Fixed capacity of the field.
        capacity: usize,
    },

    // =========================================================================
    // TRANSPORT ERRORS
    // =========================================================================
    /// The signal-strength query failed or no session is active.
    ///
    /// Treated as "no sample this cycle", never as a state change.
    #[error("Transport unavailable: {0}")]
    TransportUnavailable(String),

    // =========================================================================
    // CONFIGURATION ERRORS
    // =========================================================================
    /// The configuration file could not be read.
    #[error("Failed to read configuration: {0}")]
    ConfigRead(#[from] std::io::Error),

    /// The configuration file exists but could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// The configuration was parsed but contains invalid values.
    #[error("Configuration validation failed: {field}: {message}")]
    ConfigValidation {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// A specialized [`Result`] type for leash core operations.
pub type Result<T> = std::result::Result<T, LeashError>;

impl LeashError {
    /// Returns `true` if this error is an authentication/authorization rejection.
    #[inline]
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthenticationFailed | Self::Unauthorized)
    }

    /// Returns `true` if this error is a malformed or out-of-bounds write.
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::OutOfRange { .. })
    }

    /// Returns `true` if this error is related to configuration.
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigRead(_) | Self::ConfigParse(_) | Self::ConfigValidation { .. }
        )
    }

    /// Returns `true` if the condition is expected to clear on its own.
    ///
    /// A failed signal-strength query only means the sampler skips one
    /// cycle; the next cycle retries from scratch.
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransportUnavailable(_))
    }

    /// Returns the attribute-protocol error code reported to the peer when
    /// a write is rejected.
    #[inline]
    #[must_use]
    pub fn att_error_code(&self) -> u8 {
        match self {
            // ATT "Insufficient Authentication"
            Self::AuthenticationFailed | Self::Unauthorized => 0x05,
            // ATT "Invalid Offset"
            Self::InvalidInput(_) | Self::OutOfRange { .. } => 0x07,
            // ATT "Unlikely Error" - nothing the peer can act on
            Self::TransportUnavailable(_)
            | Self::ConfigRead(_)
            | Self::ConfigParse(_)
            | Self::ConfigValidation { .. } => 0x0E,
        }
    }
}

impl From<toml::de::Error> for LeashError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}

impl From<toml::ser::Error> for LeashError {
    fn from(err: toml::ser::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
