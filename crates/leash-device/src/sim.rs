//! Simulated collaborators for development runs and runtime tests.
//!
//! `SimTransport` stands in for the radio stack: it tracks an advertising
//! flag, the connected peer, a scriptable signal-strength value, and the
//! peer's notification subscriptions. `SimTag` and `SimLeds` log what real
//! hardware would emit. The demo script walks the whole state machine:
//! connect, authenticate, arm, drift out of range, recover, vanish, clear.

use std::sync::Arc;
use std::time::Duration;

use leash_core::{Attribute, Button, Event, LeashError, ProfileField, Result, SessionHandle};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::hal::{Led, Leds, TagEmulator, Transport};
use crate::runtime::EventSender;

#[derive(Debug)]
struct SimLink {
    connected: Option<SessionHandle>,
    advertising: bool,
    rssi: i8,
    rssi_subscribed: bool,
    armed_subscribed: bool,
}

/// Scriptable in-memory transport.
#[derive(Debug)]
pub struct SimTransport {
    events: EventSender,
    link: Mutex<SimLink>,
}

impl SimTransport {
    /// Create a disconnected, non-advertising transport.
    #[must_use]
    pub fn new(events: EventSender) -> Arc<Self> {
        Arc::new(Self {
            events,
            link: Mutex::new(SimLink {
                connected: None,
                advertising: false,
                rssi: -50,
                rssi_subscribed: true,
                armed_subscribed: true,
            }),
        })
    }

    /// Script: a peer connects.
    pub async fn peer_connect(&self, handle: SessionHandle) {
        self.link.lock().await.connected = Some(handle);
        self.events.send(Event::Connected { handle }).await;
    }

    /// Script: the peer vanishes (link loss, not a requested disconnect).
    pub async fn peer_drop(&self) {
        self.link.lock().await.connected = None;
        self.events.send(Event::Disconnected).await;
    }

    /// Script: set the signal strength the next samples will read.
    pub async fn set_rssi(&self, rssi: i8) {
        self.link.lock().await.rssi = rssi;
    }

    /// Script: the peer subscribes or unsubscribes from notifications.
    pub async fn set_subscriptions(&self, rssi: bool, armed: bool) {
        let mut link = self.link.lock().await;
        link.rssi_subscribed = rssi;
        link.armed_subscribed = armed;
    }
}

impl Transport for SimTransport {
    async fn read_rssi(&self, handle: SessionHandle) -> Result<i8> {
        let link = self.link.lock().await;
        match link.connected {
            Some(current) if current == handle => Ok(link.rssi),
            _ => Err(LeashError::TransportUnavailable(
                "no active session".to_string(),
            )),
        }
    }

    async fn notify_rssi(&self, rssi: i8) -> Result<()> {
        let link = self.link.lock().await;
        if link.connected.is_some() && link.rssi_subscribed {
            info!(rssi, "notified peer of signal strength");
        } else {
            debug!(rssi, "rssi notification dropped; peer not subscribed");
        }
        Ok(())
    }

    async fn notify_armed(&self, armed: bool) -> Result<()> {
        let link = self.link.lock().await;
        if link.connected.is_some() && link.armed_subscribed {
            info!(armed, "notified peer of armed state");
        } else {
            debug!(armed, "armed notification dropped; peer not subscribed");
        }
        Ok(())
    }

    async fn is_advertising(&self) -> bool {
        self.link.lock().await.advertising
    }

    async fn start_advertising(&self) -> Result<()> {
        self.link.lock().await.advertising = true;
        info!("advertising started");
        Ok(())
    }

    async fn stop_advertising(&self) -> Result<()> {
        self.link.lock().await.advertising = false;
        info!("advertising stopped");
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.link.lock().await.connected = None;
        info!("session dropped on request");
        self.events.send(Event::Disconnected).await;
        Ok(())
    }
}

/// In-memory passive tag.
#[derive(Debug, Default)]
pub struct SimTag {
    payload: Mutex<Vec<u8>>,
}

impl SimTag {
    /// Create a tag with an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current payload, for tests and the demo log.
    pub async fn payload(&self) -> Vec<u8> {
        self.payload.lock().await.clone()
    }
}

impl TagEmulator for SimTag {
    async fn set_payload(&self, payload: Vec<u8>) -> Result<()> {
        info!(len = payload.len(), "discovery payload updated");
        *self.payload.lock().await = payload;
        Ok(())
    }
}

/// Logs indicator transitions instead of driving GPIOs.
#[derive(Debug, Default)]
pub struct SimLeds {
    last: std::sync::Mutex<[Option<bool>; 4]>,
}

impl SimLeds {
    /// Create with all outputs unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    const fn index(led: Led) -> usize {
        match led {
            Led::Link => 0,
            Led::Activity => 1,
            Led::Armed => 2,
            Led::Alarm => 3,
        }
    }
}

impl Leds for SimLeds {
    fn set(&self, led: Led, on: bool) {
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let slot = &mut last[Self::index(led)];
        // Blink transitions are noisy; only log steady-state changes at
        // debug and leave the per-tick toggling silent.
        if *slot != Some(on) {
            debug!(?led, on, "indicator");
            *slot = Some(on);
        }
    }
}

/// Walk the state machine end to end against the simulator.
///
/// Intended for development runs of the binary; each phase logs what a
/// real peer and real radio conditions would produce.
pub async fn run_demo_script(transport: Arc<SimTransport>, events: EventSender, secret: String) {
    let step = Duration::from_secs(1);

    tokio::time::sleep(2 * step).await;
    info!("demo: peer connects");
    transport.peer_connect(SessionHandle(1)).await;

    tokio::time::sleep(step).await;
    info!("demo: peer authenticates");
    if let Err(err) = events
        .request(Event::AttributeWrite {
            attribute: Attribute::Credential,
            offset: 0,
            data: secret.into_bytes(),
        })
        .await
    {
        info!(%err, "demo: authentication rejected; stopping script");
        return;
    }

    info!("demo: peer updates the pet name");
    let _ = events
        .request(Event::AttributeWrite {
            attribute: Attribute::Profile(ProfileField::PetName),
            offset: 0,
            data: b"rex".to_vec(),
        })
        .await;

    info!("demo: peer arms the leash");
    let _ = events
        .request(Event::AttributeWrite {
            attribute: Attribute::Armed,
            offset: 0,
            data: vec![1],
        })
        .await;

    tokio::time::sleep(2 * step).await;
    info!("demo: pet drifts out of range");
    transport.set_rssi(-85).await;

    // Six weak one-second samples latch the alarm.
    tokio::time::sleep(8 * step).await;
    info!("demo: pet comes back");
    transport.set_rssi(-45).await;

    tokio::time::sleep(3 * step).await;
    info!("demo: link drops while armed");
    transport.peer_drop().await;

    tokio::time::sleep(3 * step).await;
    info!("demo: owner presses clear-alarm");
    events
        .send(Event::ButtonEdge {
            button: Button::ClearAlarm,
        })
        .await;

    info!("demo: done; tag keeps advertising");
}
