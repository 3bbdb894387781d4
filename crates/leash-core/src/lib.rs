//! # leash-core
//!
//! Core state machine for the leash pet-tag device: a wearable tag that
//! authenticates a paired peer over a short-range radio link, lets the
//! authenticated peer arm a proximity leash alarm, and autonomously latches
//! the alarm when the peer disconnects or drifts out of range while armed.
//!
//! This crate is pure logic with no I/O. The device runtime feeds it typed
//! events and performs the effects it returns.
//!
//! ## Architecture
//!
//! - [`credential`] - Shared-secret authentication gate
//! - [`profile`] - Bounded identity/owner text fields
//! - [`session`] - The single active peer connection
//! - [`alarm`] - Arming, debounced triggering, and latch semantics
//! - [`events`] - Typed events in, effects out
//! - [`state`] - The shared state container applying atomic transitions
//! - [`indicator`] - Pure projection onto the four indicator outputs
//! - [`config`] - Configuration loading, saving, and validation
//! - [`error`] - Unified error types for the crate

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

pub mod alarm;
pub mod config;
pub mod credential;
pub mod error;
pub mod events;
pub mod indicator;
pub mod profile;
pub mod session;
pub mod state;

// Re-export primary types for convenience
pub use alarm::{AlarmSupervisor, SampleOutcome};
pub use config::{ProfileDefaults, TagConfig, MAX_SECRET_LEN};
pub use credential::CredentialGate;
pub use error::{LeashError, Result};
pub use events::{Attribute, Button, Effect, Event};
pub use indicator::{IndicatorFrame, IndicatorInputs, LedMode};
pub use profile::{BoundedText, ProfileField, ProfileStore, MAX_FIELD_LEN};
pub use session::{SessionHandle, SessionTracker};
pub use state::TagState;
