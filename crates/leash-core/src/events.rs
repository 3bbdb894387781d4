//! Typed events and effects.
//!
//! Transport callbacks, physical buttons, the passive tag reader, and the
//! periodic sampler all feed a single bounded channel of [`Event`]s instead
//! of mutating shared flags from their own contexts. Applying an event
//! yields [`Effect`]s for the runtime to perform best-effort against the
//! external collaborators; effects never feed back into state.

use crate::profile::ProfileField;
use crate::session::SessionHandle;

/// The four physical button intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Drop the session, or stop advertising when disconnected.
    ResetLink,
    /// Clear the authenticated flag.
    ResetAuth,
    /// Flip the armed flag (only effective while connected).
    ToggleArmed,
    /// Clear the alarm latch and disarm.
    ClearAlarm,
}

/// Logical fields on the attribute surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// Current signal strength (read + notify).
    SignalStrength,
    /// Armed flag (read + write + notify, write gated by authentication).
    Armed,
    /// Credential (write-only, authenticate-or-fail; reads expose the flag).
    Credential,
    /// One of the four profile text fields (read + authenticated write).
    Profile(ProfileField),
}

/// Everything that can happen to the tag, in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The transport established a connection.
    Connected {
        /// Channel handle for signal-strength queries.
        handle: SessionHandle,
    },
    /// The transport lost or closed the connection.
    Disconnected,
    /// The peer wrote an attribute. Chunked writes arrive as several
    /// events with increasing offsets.
    AttributeWrite {
        /// Target attribute.
        attribute: Attribute,
        /// Byte offset of this chunk.
        offset: usize,
        /// Chunk payload.
        data: Vec<u8>,
    },
    /// A physical button edge.
    ButtonEdge {
        /// Decoded intent.
        button: Button,
    },
    /// The periodic sampler obtained a signal-strength reading.
    SignalSample {
        /// Reading in dBm.
        rssi: i8,
    },
    /// A passive reader read the tag while we were disconnected.
    TagRead,
}

/// Side effects the runtime performs after an event is applied.
///
/// All best-effort and fire-and-forget: a failed or skipped effect is
/// logged, never retried, and never touches internal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Notify the peer of the armed flag.
    NotifyArmed(bool),
    /// Notify the peer of a signal-strength reading.
    NotifyRssi(i8),
    /// Re-encode the discovery payload from the profile fields.
    RebuildPayload,
    /// Ask the transport to drop the session.
    Disconnect,
    /// Ask the transport to start advertising (if it is not already).
    StartAdvertising,
    /// Ask the transport to stop advertising (if it is).
    StopAdvertising,
}
