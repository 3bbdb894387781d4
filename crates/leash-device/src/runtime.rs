//! Task orchestration: the event driver loop, the periodic signal-strength
//! sampler, and the indicator driver.
//!
//! All shared state lives in one `Arc<RwLock<TagState>>`. Transport
//! callbacks, button edges, and tag reads arrive as envelopes on a bounded
//! channel and are applied by a single driver loop, one write-lock
//! acquisition per event, so every multi-step transition is atomic with
//! respect to the periodic tasks. Effects run after the lock is released
//! and are best-effort: failures are logged, never retried.

use std::sync::Arc;
use std::time::Duration;

use leash_core::{Effect, Event, LeashError, LedMode, Result, TagConfig, TagState};
use tokio::sync::{mpsc, oneshot, RwLock};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::hal::{Led, Leds, TagEmulator, Transport};
use crate::payload;

/// Shared handle to the device state.
pub type SharedState = Arc<RwLock<TagState>>;

/// Capacity of the event channel. Transport callbacks and button edges are
/// sparse; a small bound keeps a wedged driver from hiding behind a queue.
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

/// An event plus an optional reply slot.
///
/// Attribute writes need a caller-visible outcome (the transport reports
/// the ATT error code to the peer); everything else is fire-and-forget.
#[derive(Debug)]
pub struct Envelope {
    /// The event to apply.
    pub event: Event,
    /// Where to report the outcome, when the caller cares.
    pub reply: Option<oneshot::Sender<Result<()>>>,
}

/// Cloneable sending half of the event channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<Envelope>,
}

impl EventSender {
    /// Enqueue an event, fire-and-forget. A closed channel (runtime shut
    /// down) is logged and dropped.
    pub async fn send(&self, event: Event) {
        if self
            .tx
            .send(Envelope { event, reply: None })
            .await
            .is_err()
        {
            debug!("event channel closed; event dropped");
        }
    }

    /// Enqueue an event and wait for the outcome.
    ///
    /// # Errors
    ///
    /// Returns the rejection the state machine produced, or
    /// `TransportUnavailable` if the runtime is gone.
    pub async fn request(&self, event: Event) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Envelope {
                event,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| LeashError::TransportUnavailable("event channel closed".to_string()))?;
        reply_rx
            .await
            .map_err(|_| LeashError::TransportUnavailable("runtime dropped reply".to_string()))?
    }
}

/// Create the bounded event channel.
#[must_use]
pub fn event_channel() -> (EventSender, mpsc::Receiver<Envelope>) {
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    (EventSender { tx }, rx)
}

/// The device runtime: owns the receiving half of the event channel and
/// the periodic tasks.
pub struct Runtime<T, E, L> {
    state: SharedState,
    events: mpsc::Receiver<Envelope>,
    transport: Arc<T>,
    tag: Arc<E>,
    leds: Arc<L>,
    sample_interval: Duration,
    indicator_interval: Duration,
}

impl<T: Transport, E: TagEmulator, L: Leds> Runtime<T, E, L> {
    /// Assemble the runtime around shared state and collaborators.
    pub fn new(
        config: &TagConfig,
        state: SharedState,
        events: mpsc::Receiver<Envelope>,
        transport: Arc<T>,
        tag: Arc<E>,
        leds: Arc<L>,
    ) -> Self {
        Self {
            state,
            events,
            transport,
            tag,
            leds,
            sample_interval: Duration::from_secs(config.sample_interval_secs),
            indicator_interval: Duration::from_millis(config.indicator_interval_ms),
        }
    }

    /// Run until the event channel closes.
    ///
    /// Spawns the sampler and indicator tasks, then drives the event loop
    /// on the current task.
    pub async fn run(mut self) {
        let sampler = tokio::spawn(sampler_loop(
            Arc::clone(&self.state),
            Arc::clone(&self.transport),
            Arc::clone(&self.tag),
            self.sample_interval,
        ));
        let indicator = tokio::spawn(indicator_loop(
            Arc::clone(&self.state),
            Arc::clone(&self.transport),
            Arc::clone(&self.leds),
            self.indicator_interval,
        ));

        while let Some(Envelope { event, reply }) = self.events.recv().await {
            let outcome = self.state.write().await.apply(event);
            match outcome {
                Ok(effects) => {
                    perform_effects(&effects, &self.state, &*self.transport, &*self.tag).await;
                    if let Some(reply) = reply {
                        let _ = reply.send(Ok(()));
                    }
                }
                Err(err) => {
                    warn!(code = err.att_error_code(), %err, "event rejected");
                    if let Some(reply) = reply {
                        let _ = reply.send(Err(err));
                    }
                }
            }
        }

        info!("event channel closed; stopping runtime");
        sampler.abort();
        indicator.abort();
    }
}

/// Encode and publish the discovery payload. Called once at startup and on
/// every `RebuildPayload` effect.
///
/// # Errors
///
/// Returns the emulator's error; callers on the write path treat it as
/// best-effort.
pub async fn publish_payload<E: TagEmulator>(state: &SharedState, tag: &E) -> Result<()> {
    let payload = {
        let state = state.read().await;
        payload::encode(&state)
    };
    tag.set_payload(payload).await
}

/// Perform the effects of one applied event, best-effort.
async fn perform_effects<T: Transport, E: TagEmulator>(
    effects: &[Effect],
    state: &SharedState,
    transport: &T,
    tag: &E,
) {
    for effect in effects {
        match *effect {
            Effect::NotifyArmed(armed) => {
                if let Err(err) = transport.notify_armed(armed).await {
                    debug!(%err, "armed notification skipped");
                }
            }
            Effect::NotifyRssi(rssi) => {
                if let Err(err) = transport.notify_rssi(rssi).await {
                    debug!(%err, "rssi notification skipped");
                }
            }
            Effect::RebuildPayload => {
                if let Err(err) = publish_payload(state, tag).await {
                    warn!(%err, "discovery payload update failed");
                }
            }
            Effect::Disconnect => {
                if let Err(err) = transport.disconnect().await {
                    warn!(%err, "disconnect request failed");
                }
            }
            Effect::StartAdvertising => {
                if !transport.is_advertising().await {
                    if let Err(err) = transport.start_advertising().await {
                        warn!(%err, "advertising start failed");
                    }
                }
            }
            Effect::StopAdvertising => {
                if transport.is_advertising().await {
                    if let Err(err) = transport.stop_advertising().await {
                        warn!(%err, "advertising stop failed");
                    }
                }
            }
        }
    }
}

/// Periodic sampler: once per interval, while a session exists, query the
/// transport for signal strength and feed the reading to the state machine.
async fn sampler_loop<T: Transport, E: TagEmulator>(
    state: SharedState,
    transport: Arc<T>,
    tag: Arc<E>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;

        // Snapshot the handle, then query without holding the lock; the
        // transport call may take bounded time and must not stall the
        // indicator driver or event handling.
        let handle = { state.read().await.session_handle() };
        let Some(handle) = handle else { continue };

        match transport.read_rssi(handle).await {
            Ok(rssi) => {
                let outcome = state.write().await.apply(Event::SignalSample { rssi });
                if let Ok(effects) = outcome {
                    perform_effects(&effects, &state, &*transport, &*tag).await;
                }
            }
            Err(err) => debug!(%err, "no sample this cycle"),
        }
    }
}

/// Indicator driver: derives the four outputs from current state on a
/// fixed cadence. Pure reader apart from consuming activity pulses.
async fn indicator_loop<T: Transport, L: Leds>(
    state: SharedState,
    transport: Arc<T>,
    leds: Arc<L>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut tick: u8 = 0;
    loop {
        ticker.tick().await;

        let advertising = transport.is_advertising().await;
        let frame = state.write().await.indicator_tick(advertising);

        let phase = tick % 2 == 0;
        leds.set(Led::Link, drive(frame.link, phase));
        leds.set(Led::Activity, drive(frame.activity, phase));
        leds.set(Led::Armed, drive(frame.armed, phase));
        leds.set(Led::Alarm, drive(frame.alarm, phase));

        tick = tick.wrapping_add(1);
    }
}

const fn drive(mode: LedMode, phase: bool) -> bool {
    match mode {
        LedMode::Off => false,
        LedMode::Solid => true,
        LedMode::Blink => phase,
    }
}
