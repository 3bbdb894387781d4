//! The shared device state container.
//!
//! [`TagState`] owns the credential gate, session tracker, alarm
//! supervisor, and profile store, and applies every transition as a single
//! operation. The runtime wraps it in `Arc<RwLock<_>>`; because each
//! [`Event`] is applied under one lock acquisition, multi-step transitions
//! such as the disconnect latch (read `armed`, conditionally latch, clear
//! `armed`) cannot interleave with a concurrent arm or disarm.

use tracing::{debug, info};

use crate::alarm::AlarmSupervisor;
use crate::config::TagConfig;
use crate::credential::CredentialGate;
use crate::error::{LeashError, Result};
use crate::events::{Attribute, Button, Effect, Event};
use crate::indicator::{IndicatorFrame, IndicatorInputs};
use crate::profile::{ProfileField, ProfileStore};
use crate::session::{SessionHandle, SessionTracker};

/// Number of indicator ticks the activity pulse blinks after a profile write.
const ACTIVITY_PULSES: u8 = 4;

/// Process-wide device state: one tag, one peer at a time.
#[derive(Debug)]
pub struct TagState {
    gate: CredentialGate,
    session: SessionTracker,
    alarm: AlarmSupervisor,
    profile: ProfileStore,
    activity_pulses: u8,
}

impl TagState {
    /// Build the initial state from configuration. All state is volatile
    /// and starts from these defaults on every boot.
    #[must_use]
    pub fn new(config: &TagConfig) -> Self {
        Self {
            gate: CredentialGate::new(&config.secret),
            session: SessionTracker::new(),
            alarm: AlarmSupervisor::new(config.rssi_threshold, config.weak_signal_limit),
            profile: ProfileStore::new(
                &config.profile.pet_name,
                &config.profile.owner_name,
                &config.profile.owner_address,
                &config.profile.owner_phone,
            ),
            activity_pulses: 0,
        }
    }

    /// Apply one event and return the effects to perform.
    ///
    /// # Errors
    ///
    /// Rejected attribute writes return the error the transport reports to
    /// the peer; state is unchanged. No other event kind fails.
    pub fn apply(&mut self, event: Event) -> Result<Vec<Effect>> {
        match event {
            Event::Connected { handle } => Ok(self.on_connect(handle)),
            Event::Disconnected => Ok(self.on_disconnect()),
            Event::AttributeWrite {
                attribute,
                offset,
                data,
            } => self.on_attribute_write(attribute, offset, &data),
            Event::ButtonEdge { button } => Ok(self.on_button(button)),
            Event::SignalSample { rssi } => Ok(self.on_sample(rssi)),
            Event::TagRead => Ok(self.on_tag_read()),
        }
    }

    fn on_connect(&mut self, handle: SessionHandle) -> Vec<Effect> {
        // A new session always starts unauthenticated and unarmed, even
        // when the previous alarm is still latched.
        self.session.open(handle);
        self.gate.reset();
        self.alarm.disarm();
        info!(handle = handle.0, "peer connected");
        vec![Effect::StopAdvertising, Effect::NotifyArmed(false)]
    }

    fn on_disconnect(&mut self) -> Vec<Effect> {
        // Latch evaluation must precede clearing `armed`.
        self.alarm.on_disconnect();
        self.session.close();
        self.gate.reset();
        info!(alarm = self.alarm.is_alarm_active(), "peer disconnected");
        Vec::new()
    }

    fn on_attribute_write(
        &mut self,
        attribute: Attribute,
        offset: usize,
        data: &[u8],
    ) -> Result<Vec<Effect>> {
        match attribute {
            Attribute::Credential => {
                if offset != 0 {
                    return Err(LeashError::InvalidInput(
                        "credential writes must not be chunked".to_string(),
                    ));
                }
                self.gate.submit(data)?;
                Ok(Vec::new())
            }
            Attribute::Armed => {
                if !self.session.has_session() {
                    // Arming with no session is a no-op, not an error.
                    return Ok(Vec::new());
                }
                if !self.gate.is_authenticated() {
                    return Err(LeashError::Unauthorized);
                }
                let Some(&value) = data.first() else {
                    return Err(LeashError::InvalidInput("empty armed write".to_string()));
                };
                self.alarm.set_armed(value != 0);
                Ok(vec![Effect::NotifyArmed(self.alarm.is_armed())])
            }
            Attribute::Profile(field) => {
                if !self.gate.is_authenticated() {
                    return Err(LeashError::Unauthorized);
                }
                self.profile.write(field, offset, data)?;
                self.activity_pulses = ACTIVITY_PULSES;
                debug!(?field, offset, len = data.len(), "profile field written");
                Ok(vec![Effect::RebuildPayload])
            }
            Attribute::SignalStrength => Err(LeashError::InvalidInput(
                "signal strength is read-only".to_string(),
            )),
        }
    }

    fn on_button(&mut self, button: Button) -> Vec<Effect> {
        match button {
            Button::ResetLink => {
                if self.session.has_session() {
                    vec![Effect::Disconnect]
                } else {
                    vec![Effect::StopAdvertising]
                }
            }
            Button::ResetAuth => {
                self.gate.reset();
                Vec::new()
            }
            Button::ToggleArmed => {
                if !self.session.has_session() {
                    return Vec::new();
                }
                self.alarm.set_armed(!self.alarm.is_armed());
                vec![Effect::NotifyArmed(self.alarm.is_armed())]
            }
            Button::ClearAlarm => {
                self.alarm.clear();
                if self.session.has_session() {
                    vec![Effect::NotifyArmed(false)]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn on_sample(&mut self, rssi: i8) -> Vec<Effect> {
        // The session can drop between the sampler's transport query and
        // this application; a late sample is then meaningless.
        if !self.session.has_session() {
            return Vec::new();
        }
        self.alarm.sample(rssi);
        vec![Effect::NotifyRssi(rssi)]
    }

    fn on_tag_read(&mut self) -> Vec<Effect> {
        if self.session.has_session() {
            Vec::new()
        } else {
            vec![Effect::StartAdvertising]
        }
    }

    /// Serve an attribute read. Unrestricted, always available.
    #[must_use]
    pub fn read_attribute(&self, attribute: Attribute) -> Vec<u8> {
        match attribute {
            #[allow(clippy::cast_sign_loss)]
            Attribute::SignalStrength => vec![self.alarm.last_signal_strength() as u8],
            Attribute::Armed => vec![u8::from(self.alarm.is_armed())],
            Attribute::Credential => vec![u8::from(self.gate.is_authenticated())],
            Attribute::Profile(field) => self.profile.read(field).to_vec(),
        }
    }

    /// Compute one indicator frame and advance the activity pulse counter.
    ///
    /// The projection itself is pure; the pulse counter belongs to the
    /// indicator cadence and is the only thing a tick consumes.
    pub fn indicator_tick(&mut self, advertising: bool) -> IndicatorFrame {
        let frame = IndicatorFrame::project(IndicatorInputs {
            has_session: self.session.has_session(),
            advertising,
            authenticated: self.gate.is_authenticated(),
            armed: self.alarm.is_armed(),
            alarm_active: self.alarm.is_alarm_active(),
            activity_pulses: self.activity_pulses,
        });
        self.activity_pulses = self.activity_pulses.saturating_sub(1);
        frame
    }

    /// Whether a peer is connected.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.session.has_session()
    }

    /// Channel handle of the active session, for signal-strength queries.
    #[must_use]
    pub const fn session_handle(&self) -> Option<SessionHandle> {
        self.session.handle()
    }

    /// Whether a correct secret has been presented this session.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.gate.is_authenticated()
    }

    /// Whether the leash is armed.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.alarm.is_armed()
    }

    /// Whether the alarm is latched.
    #[must_use]
    pub const fn is_alarm_active(&self) -> bool {
        self.alarm.is_alarm_active()
    }

    /// Profile field text for payload encoding.
    #[must_use]
    pub fn profile_text(&self, field: ProfileField) -> std::borrow::Cow<'_, str> {
        self.profile.display(field)
    }
}
