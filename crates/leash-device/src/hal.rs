//! Collaborator interfaces: the boundaries of the core.
//!
//! The radio transport, the passive tag emulator, and the indicator
//! hardware are external collaborators. The runtime only depends on these
//! traits; hardware backends and the simulator implement them.

use std::future::Future;

use leash_core::{Result, SessionHandle};

/// The radio transport collaborator.
///
/// Connect/disconnect events, attribute writes, and passive tag reads flow
/// the other way, as [`leash_core::Event`]s on the runtime's event channel.
pub trait Transport: Send + Sync + 'static {
    /// Query the current signal strength of the active session.
    ///
    /// A sentinel or failed reading maps to `TransportUnavailable`; the
    /// sampler treats that as "no sample this cycle".
    fn read_rssi(&self, handle: SessionHandle) -> impl Future<Output = Result<i8>> + Send;

    /// Notify the peer of a signal-strength reading. Best-effort; dropped
    /// when the peer has not subscribed.
    fn notify_rssi(&self, rssi: i8) -> impl Future<Output = Result<()>> + Send;

    /// Notify the peer of the armed flag. Best-effort.
    fn notify_armed(&self, armed: bool) -> impl Future<Output = Result<()>> + Send;

    /// Whether the transport is currently advertising.
    fn is_advertising(&self) -> impl Future<Output = bool> + Send;

    /// Start advertising.
    fn start_advertising(&self) -> impl Future<Output = Result<()>> + Send;

    /// Stop advertising.
    fn stop_advertising(&self) -> impl Future<Output = Result<()>> + Send;

    /// Drop the active session.
    fn disconnect(&self) -> impl Future<Output = Result<()>> + Send;
}

/// The passive tag (contactless) collaborator.
pub trait TagEmulator: Send + Sync + 'static {
    /// Replace the passively readable payload.
    fn set_payload(&self, payload: Vec<u8>) -> impl Future<Output = Result<()>> + Send;
}

/// The four indicator outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Led {
    /// Link status indicator.
    Link,
    /// Authentication/activity indicator.
    Activity,
    /// Armed status indicator.
    Armed,
    /// Alarm indicator.
    Alarm,
}

impl Led {
    /// All outputs, in frame order.
    pub const ALL: [Self; 4] = [Self::Link, Self::Activity, Self::Armed, Self::Alarm];
}

/// The indicator output collaborator.
pub trait Leds: Send + Sync + 'static {
    /// Drive one output. Called on every indicator tick.
    fn set(&self, led: Led, on: bool);
}
