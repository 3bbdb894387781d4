//! # leash-device
//!
//! Device runtime for the leash pet tag. Wires the pure state machine from
//! `leash-core` to its external collaborators: the radio transport, the
//! passive tag emulator, and the button/indicator hardware.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod hal;
pub mod logging;
pub mod payload;
pub mod runtime;
pub mod sim;
