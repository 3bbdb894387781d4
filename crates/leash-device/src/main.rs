//! # leash-device
//!
//! Runtime binary for the leash pet tag.
//!
//! Boot order mirrors the hardware: publish the discovery payload, start
//! advertising, then bring up the event driver, sampler, and indicator
//! tasks. This build wires the simulated collaborators and replays a demo
//! scenario; hardware backends implement the traits in [`leash_device::hal`].
//!
//! ## Running
//!
//! ```bash
//! # Development (pretty logs, demo scenario)
//! cargo run --package leash-device
//!
//! # With a config file
//! cargo run --package leash-device -- /etc/leash/config.toml
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use leash_core::{TagConfig, TagState};
use leash_device::hal::Transport;
use leash_device::runtime::{event_channel, publish_payload, Runtime, SharedState};
use leash_device::{logging, sim};
use tokio::sync::RwLock;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let is_production = std::env::var("LEASH_ENV").is_ok_and(|v| v == "production");
    logging::init(is_production)?;

    info!("Starting leash-device");

    let config_path = std::env::args()
        .nth(1)
        .map_or_else(TagConfig::default_path, PathBuf::from);
    let config = TagConfig::load_or_default(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;
    info!(
        device = %config.device_name,
        threshold = config.rssi_threshold,
        "configuration loaded"
    );

    let state: SharedState = Arc::new(RwLock::new(TagState::new(&config)));
    let (events, receiver) = event_channel();

    let transport = sim::SimTransport::new(events.clone());
    let tag = Arc::new(sim::SimTag::new());
    let leds = Arc::new(sim::SimLeds::new());

    // Publish the passive payload before anyone can read it, then open
    // the radio side.
    publish_payload(&state, tag.as_ref())
        .await
        .context("publishing initial discovery payload")?;
    transport
        .start_advertising()
        .await
        .context("starting advertising")?;

    let runtime = Runtime::new(
        &config,
        Arc::clone(&state),
        receiver,
        Arc::clone(&transport),
        Arc::clone(&tag),
        leds,
    );

    let demo = tokio::spawn(sim::run_demo_script(
        Arc::clone(&transport),
        events.clone(),
        config.secret.clone(),
    ));

    tokio::select! {
        () = runtime.run() => {}
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }
    demo.abort();

    Ok(())
}
