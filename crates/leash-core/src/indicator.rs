//! Indicator policy: projects component state onto the four indicators.
//!
//! A pure function of current state. The indicator driver in the runtime
//! calls this on its own cadence and maps [`LedMode::Blink`] to its tick
//! parity; nothing here may influence the state machine.

/// Drive mode for one indicator output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedMode {
    /// Output off.
    Off,
    /// Output on.
    Solid,
    /// Output toggles with the driver's tick parity.
    Blink,
}

/// Snapshot of state the projection reads.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorInputs {
    /// A peer is connected.
    pub has_session: bool,
    /// The transport is advertising.
    pub advertising: bool,
    /// The credential gate is open.
    pub authenticated: bool,
    /// The leash is armed.
    pub armed: bool,
    /// The alarm is latched.
    pub alarm_active: bool,
    /// Remaining activity pulses from recent profile writes.
    pub activity_pulses: u8,
}

/// Drive modes for the four indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorFrame {
    /// Link status: solid when connected, blinking while advertising.
    pub link: LedMode,
    /// Authentication/activity: solid when authenticated, blinking while
    /// activity pulses are pending.
    pub activity: LedMode,
    /// Armed status: solid iff connected and armed.
    pub armed: LedMode,
    /// Alarm status: blinking iff the alarm is latched, session or not.
    pub alarm: LedMode,
}

impl IndicatorFrame {
    /// Derive the frame from current state.
    #[must_use]
    pub const fn project(inputs: IndicatorInputs) -> Self {
        let link = if inputs.has_session {
            LedMode::Solid
        } else if inputs.advertising {
            LedMode::Blink
        } else {
            LedMode::Off
        };

        let activity = if !inputs.authenticated {
            LedMode::Off
        } else if inputs.activity_pulses > 0 {
            LedMode::Blink
        } else {
            LedMode::Solid
        };

        let armed = if inputs.has_session && inputs.armed {
            LedMode::Solid
        } else {
            LedMode::Off
        };

        let alarm = if inputs.alarm_active {
            LedMode::Blink
        } else {
            LedMode::Off
        };

        Self {
            link,
            activity,
            armed,
            alarm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn idle() -> IndicatorInputs {
        IndicatorInputs {
            has_session: false,
            advertising: false,
            authenticated: false,
            armed: false,
            alarm_active: false,
            activity_pulses: 0,
        }
    }

    #[test]
    fn test_link_modes() {
        assert_eq!(IndicatorFrame::project(idle()).link, LedMode::Off);

        let advertising = IndicatorInputs {
            advertising: true,
            ..idle()
        };
        assert_eq!(IndicatorFrame::project(advertising).link, LedMode::Blink);

        let connected = IndicatorInputs {
            has_session: true,
            advertising: true,
            ..idle()
        };
        // Session wins over a stale advertising flag.
        assert_eq!(IndicatorFrame::project(connected).link, LedMode::Solid);
    }

    #[test]
    fn test_activity_modes() {
        assert_eq!(IndicatorFrame::project(idle()).activity, LedMode::Off);

        let authed = IndicatorInputs {
            has_session: true,
            authenticated: true,
            ..idle()
        };
        assert_eq!(IndicatorFrame::project(authed).activity, LedMode::Solid);

        let writing = IndicatorInputs {
            activity_pulses: 3,
            ..authed
        };
        assert_eq!(IndicatorFrame::project(writing).activity, LedMode::Blink);
    }

    #[test]
    fn test_armed_requires_session() {
        let armed_no_session = IndicatorInputs {
            armed: true,
            ..idle()
        };
        assert_eq!(IndicatorFrame::project(armed_no_session).armed, LedMode::Off);

        let armed = IndicatorInputs {
            has_session: true,
            armed: true,
            ..idle()
        };
        assert_eq!(IndicatorFrame::project(armed).armed, LedMode::Solid);
    }

    #[test]
    fn test_alarm_blinks_regardless_of_session() {
        let latched = IndicatorInputs {
            alarm_active: true,
            ..idle()
        };
        assert_eq!(IndicatorFrame::project(latched).alarm, LedMode::Blink);

        let latched_connected = IndicatorInputs {
            has_session: true,
            alarm_active: true,
            ..idle()
        };
        assert_eq!(IndicatorFrame::project(latched_connected).alarm, LedMode::Blink);
    }
}
