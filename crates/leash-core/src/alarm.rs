//! Alarm supervisor: the arming/triggering/latching state machine.
//!
//! Two flags drive everything. `armed` is the peer's (or button's) intent
//! to keep the leash taut. `alarm_active` is the latched alarm: once set it
//! stays set until an explicit clear, with one exception — a strong sample
//! while armed clears an alarm that was raised by the weak-signal debounce,
//! because that path has an ongoing corroborating signal. A disconnect
//! latch has no such signal (no session, no samples), so only an explicit
//! clear releases it.
//!
//! The weak-signal streak absorbs transient radio noise: a single weak
//! sample never triggers; the alarm fires when the streak exceeds the
//! configured limit (the 6th consecutive weak sample at the default of 5).

use tracing::{debug, info};

/// Outcome of feeding one signal sample to the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// The supervisor is not armed; the sample was ignored.
    Ignored,
    /// The signal is strong; any weak-signal alarm was cleared.
    Strong,
    /// The signal is weak but still within the debounce limit.
    Weak,
    /// The weak-signal streak exceeded the limit; the alarm is latched.
    Triggered,
}

/// Owns the armed/alarm flags, the last sample, and the debounce streak.
#[derive(Debug, Clone)]
pub struct AlarmSupervisor {
    armed: bool,
    alarm_active: bool,
    last_signal_strength: i8,
    weak_signal_streak: u8,
    rssi_threshold: i8,
    weak_signal_limit: u8,
}

impl AlarmSupervisor {
    /// Create an idle supervisor with the given trigger parameters.
    #[must_use]
    pub const fn new(rssi_threshold: i8, weak_signal_limit: u8) -> Self {
        Self {
            armed: false,
            alarm_active: false,
            last_signal_strength: 0,
            weak_signal_streak: 0,
            rssi_threshold,
            weak_signal_limit,
        }
    }

    /// Arm the leash. The caller guarantees a session exists; arming with
    /// no session is rejected upstream and never reaches here.
    pub fn arm(&mut self) {
        self.armed = true;
        self.weak_signal_streak = 0;
        info!("leash armed");
    }

    /// Explicitly disarm. Does not touch the latched alarm.
    pub fn disarm(&mut self) {
        self.armed = false;
        info!("leash disarmed");
    }

    /// Set the armed flag from an authenticated attribute write.
    pub fn set_armed(&mut self, armed: bool) {
        if armed {
            self.arm();
        } else {
            self.disarm();
        }
    }

    /// Evaluate the disconnect-latch rule. Invoked exactly once per
    /// disconnect, before `armed` is cleared: an armed disconnect latches
    /// the alarm immediately — the peer vanishing is the event the leash
    /// exists to catch, and there is no further signal to debounce.
    pub fn on_disconnect(&mut self) {
        if self.armed {
            self.alarm_active = true;
            info!("peer disconnected while armed; alarm latched");
        }
        self.armed = false;
        self.weak_signal_streak = 0;
    }

    /// Feed one signal-strength reading.
    ///
    /// Ignored entirely while disarmed; the streak does not accumulate.
    /// A strong reading resets the streak and clears a weak-signal alarm.
    /// A weak reading increments the streak and latches the alarm once the
    /// streak exceeds the limit.
    pub fn sample(&mut self, rssi: i8) -> SampleOutcome {
        self.last_signal_strength = rssi;
        if !self.armed {
            return SampleOutcome::Ignored;
        }
        if rssi > self.rssi_threshold {
            self.weak_signal_streak = 0;
            if self.alarm_active {
                info!(rssi, "signal recovered; alarm cleared");
            }
            self.alarm_active = false;
            SampleOutcome::Strong
        } else {
            self.weak_signal_streak = self.weak_signal_streak.saturating_add(1);
            if self.weak_signal_streak > self.weak_signal_limit {
                if !self.alarm_active {
                    info!(rssi, streak = self.weak_signal_streak, "weak signal; alarm latched");
                }
                self.alarm_active = true;
                SampleOutcome::Triggered
            } else {
                debug!(rssi, streak = self.weak_signal_streak, "weak signal");
                SampleOutcome::Weak
            }
        }
    }

    /// Explicit clear: the only way to release a disconnect latch.
    pub fn clear(&mut self) {
        self.armed = false;
        self.alarm_active = false;
        self.weak_signal_streak = 0;
    }

    /// Whether the leash is armed.
    #[inline]
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether the alarm is latched.
    #[inline]
    #[must_use]
    pub const fn is_alarm_active(&self) -> bool {
        self.alarm_active
    }

    /// Most recent signal-strength reading.
    #[inline]
    #[must_use]
    pub const fn last_signal_strength(&self) -> i8 {
        self.last_signal_strength
    }

    /// Current consecutive weak-sample count.
    #[inline]
    #[must_use]
    pub const fn weak_signal_streak(&self) -> u8 {
        self.weak_signal_streak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supervisor() -> AlarmSupervisor {
        AlarmSupervisor::new(-70, 5)
    }

    #[test]
    fn test_arm_resets_streak() {
        let mut alarm = supervisor();
        alarm.arm();
        alarm.sample(-80);
        alarm.disarm();
        alarm.arm();
        assert_eq!(alarm.weak_signal_streak(), 0);
    }

    #[test]
    fn test_debounce_triggers_on_sixth_weak_sample() {
        let mut alarm = supervisor();
        alarm.arm();
        for _ in 0..5 {
            assert_eq!(alarm.sample(-75), SampleOutcome::Weak);
            assert!(!alarm.is_alarm_active());
        }
        assert_eq!(alarm.sample(-75), SampleOutcome::Triggered);
        assert!(alarm.is_alarm_active());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut alarm = supervisor();
        alarm.arm();
        // -70 itself counts as weak; only readings above the threshold are strong.
        assert_eq!(alarm.sample(-70), SampleOutcome::Weak);
        assert_eq!(alarm.sample(-69), SampleOutcome::Strong);
    }

    #[test]
    fn test_strong_sample_resets_streak() {
        let mut alarm = supervisor();
        alarm.arm();
        for _ in 0..5 {
            alarm.sample(-75);
        }
        alarm.sample(-60);
        assert_eq!(alarm.weak_signal_streak(), 0);
        // The streak restarts; five more weak samples still do not trigger.
        for _ in 0..5 {
            alarm.sample(-75);
        }
        assert!(!alarm.is_alarm_active());
    }

    #[test]
    fn test_strong_sample_clears_weak_signal_alarm() {
        let mut alarm = supervisor();
        alarm.arm();
        for _ in 0..6 {
            alarm.sample(-75);
        }
        assert!(alarm.is_alarm_active());
        assert_eq!(alarm.sample(-60), SampleOutcome::Strong);
        assert!(!alarm.is_alarm_active());
    }

    #[test]
    fn test_samples_ignored_while_disarmed() {
        let mut alarm = supervisor();
        for _ in 0..10 {
            assert_eq!(alarm.sample(-90), SampleOutcome::Ignored);
        }
        assert!(!alarm.is_alarm_active());
        assert_eq!(alarm.weak_signal_streak(), 0);
        assert_eq!(alarm.last_signal_strength(), -90);
    }

    #[test]
    fn test_disconnect_latch_fires_only_when_armed() {
        let mut alarm = supervisor();
        alarm.on_disconnect();
        assert!(!alarm.is_alarm_active());

        alarm.arm();
        alarm.on_disconnect();
        assert!(alarm.is_alarm_active());
        assert!(!alarm.is_armed());
        assert_eq!(alarm.weak_signal_streak(), 0);
    }

    #[test]
    fn test_disconnect_latch_is_idempotent() {
        let mut alarm = supervisor();
        alarm.arm();
        alarm.on_disconnect();
        alarm.on_disconnect();
        assert!(alarm.is_alarm_active());
    }

    #[test]
    fn test_latched_alarm_survives_further_disconnects() {
        let mut alarm = supervisor();
        alarm.arm();
        alarm.on_disconnect();
        // Unarmed disconnects do not clear an existing latch.
        alarm.on_disconnect();
        assert!(alarm.is_alarm_active());
    }

    #[test]
    fn test_disconnect_latch_not_cleared_by_samples() {
        let mut alarm = supervisor();
        alarm.arm();
        alarm.on_disconnect();
        // Disarmed after the latch, so samples are ignored and the strong
        // reading cannot auto-clear.
        assert_eq!(alarm.sample(-40), SampleOutcome::Ignored);
        assert!(alarm.is_alarm_active());
    }

    #[test]
    fn test_explicit_clear_releases_latch() {
        let mut alarm = supervisor();
        alarm.arm();
        alarm.on_disconnect();
        alarm.clear();
        assert!(!alarm.is_alarm_active());
        assert!(!alarm.is_armed());
        assert_eq!(alarm.weak_signal_streak(), 0);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut alarm = supervisor();
        alarm.arm();
        for _ in 0..6 {
            alarm.sample(-80);
        }
        alarm.clear();
        alarm.clear();
        assert!(!alarm.is_armed());
        assert!(!alarm.is_alarm_active());
        assert_eq!(alarm.weak_signal_streak(), 0);
    }

    #[test]
    fn test_disarm_does_not_touch_latch() {
        let mut alarm = supervisor();
        alarm.arm();
        for _ in 0..6 {
            alarm.sample(-80);
        }
        alarm.disarm();
        assert!(alarm.is_alarm_active());
    }

    #[test]
    fn test_streak_saturates_without_wrapping() {
        let mut alarm = AlarmSupervisor::new(-70, 5);
        alarm.arm();
        for _ in 0..300 {
            alarm.sample(-90);
        }
        assert!(alarm.is_alarm_active());
        assert_eq!(alarm.weak_signal_streak(), u8::MAX);
    }
}
