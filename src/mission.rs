//! Mission progress: the start/run/expire state machine and the elapsed-arc
//! blink sequence.

use std::time::Duration;

use crate::color::Color;
use crate::error::OverrideError;

/// Upper bound of the elapsed-minutes counter.
pub const MAX_ELAPSED_MINUTES: u32 = 60;

/// Default minute at which the simulated battery reads empty.
pub const DEFAULT_BATTERY_DEPLETION_MINUTES: u32 = 40;

/// Number of color toggles in one blink sequence.
pub const BLINK_TOGGLES: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionPhase {
    NotStarted,
    Running,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionState {
    elapsed_minutes: u32,
    phase: MissionPhase,
    mission_duration: Duration,
}

impl MissionState {
    pub fn new(mission_duration: Duration) -> Self {
        Self {
            elapsed_minutes: 0,
            phase: MissionPhase::NotStarted,
            mission_duration,
        }
    }

    pub fn elapsed_minutes(&self) -> u32 {
        self.elapsed_minutes
    }

    pub fn phase(&self) -> MissionPhase {
        self.phase
    }

    pub fn mission_duration(&self) -> Duration {
        self.mission_duration
    }

    /// Whole minutes of the planned mission.
    pub fn mission_end_minute(&self) -> u64 {
        self.mission_duration.as_secs() / 60
    }

    pub fn is_running(&self) -> bool {
        self.phase == MissionPhase::Running
    }

    /// Begin the mission with the counter at zero. Returns `true` only on the
    /// NotStarted -> Running transition; repeated starts and starts after
    /// expiry do nothing.
    pub fn start(&mut self) -> bool {
        if self.phase != MissionPhase::NotStarted {
            return false;
        }
        self.elapsed_minutes = 0;
        self.phase = MissionPhase::Running;
        true
    }

    /// Advance one mission minute. Returns the new elapsed value, or `None`
    /// when the mission is not running.
    pub fn tick(&mut self) -> Option<u32> {
        if self.phase != MissionPhase::Running {
            return None;
        }
        if self.elapsed_minutes >= MAX_ELAPSED_MINUTES {
            self.phase = MissionPhase::Expired;
            return None;
        }
        self.elapsed_minutes += 1;
        self.expire_if_done();
        Some(self.elapsed_minutes)
    }

    /// Replace the elapsed counter with an already validated value.
    pub fn set_elapsed(&mut self, minutes: u32) {
        self.elapsed_minutes = minutes.min(MAX_ELAPSED_MINUTES);
        self.expire_if_done();
    }

    fn expire_if_done(&mut self) {
        if self.phase == MissionPhase::Running && self.elapsed_minutes >= MAX_ELAPSED_MINUTES {
            self.phase = MissionPhase::Expired;
        }
    }
}

/// Validate elapsed-minutes override input: an integer in `0..=60`.
pub fn parse_elapsed_override(input: &str) -> Result<u32, OverrideError> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| OverrideError::InvalidElapsed(trimmed.to_string()))?;
    u32::try_from(value)
        .ok()
        .filter(|minutes| *minutes <= MAX_ELAPSED_MINUTES)
        .ok_or(OverrideError::ElapsedOutOfRange(value))
}

/// Elapsed-minute thresholds that flash the elapsed arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcAlert {
    /// Twenty minutes in.
    Warning,
    /// Thirty minutes in.
    Alert,
}

impl ArcAlert {
    pub const ALL: [ArcAlert; 2] = [ArcAlert::Warning, ArcAlert::Alert];

    pub const fn threshold(self) -> u32 {
        match self {
            ArcAlert::Warning => 20,
            ArcAlert::Alert => 30,
        }
    }

    const fn index(self) -> usize {
        match self {
            ArcAlert::Warning => 0,
            ArcAlert::Alert => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkState {
    Idle,
    Blinking {
        alert: ArcAlert,
        remaining: u8,
        lit: bool,
    },
}

/// Drives the elapsed-arc outline color.
///
/// Each threshold fires once per upward crossing and re-arms only after the
/// counter drops back below it. A crossing during an active sequence restarts
/// the sequence with the newer alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcBlinker {
    state: BlinkState,
    fired: [bool; 2],
}

impl Default for ArcBlinker {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcBlinker {
    pub fn new() -> Self {
        Self {
            state: BlinkState::Idle,
            fired: [false; 2],
        }
    }

    pub fn state(&self) -> BlinkState {
        self.state
    }

    pub fn is_blinking(&self) -> bool {
        matches!(self.state, BlinkState::Blinking { .. })
    }

    /// Update thresholds for a new elapsed value. Returns the alert whose
    /// sequence just started, if any. The first toggle is applied immediately.
    pub fn on_elapsed_changed(&mut self, elapsed_minutes: u32) -> Option<ArcAlert> {
        let mut triggered = None;
        for alert in ArcAlert::ALL {
            let slot = &mut self.fired[alert.index()];
            if elapsed_minutes < alert.threshold() {
                *slot = false;
            } else if !*slot {
                *slot = true;
                triggered = Some(alert);
            }
        }
        if let Some(alert) = triggered {
            self.state = BlinkState::Blinking {
                alert,
                remaining: BLINK_TOGGLES - 1,
                lit: true,
            };
        }
        triggered
    }

    /// Advance one blink period. Returns `true` while the sequence remains
    /// active, `false` once it has settled.
    pub fn step(&mut self) -> bool {
        match self.state {
            BlinkState::Idle => false,
            BlinkState::Blinking {
                alert,
                remaining,
                lit,
            } => {
                if remaining == 0 {
                    self.state = BlinkState::Idle;
                    false
                } else {
                    self.state = BlinkState::Blinking {
                        alert,
                        remaining: remaining - 1,
                        lit: !lit,
                    };
                    true
                }
            }
        }
    }

    /// Outline color of the elapsed arc for the given palette colors.
    pub fn outline_color(
        &self,
        elapsed_minutes: u32,
        base: Color,
        warning: Color,
        alert: Color,
        background: Color,
    ) -> Color {
        let alert_color = |a: ArcAlert| match a {
            ArcAlert::Warning => warning,
            ArcAlert::Alert => alert,
        };
        match self.state {
            BlinkState::Blinking { alert, lit, .. } => {
                if lit {
                    alert_color(alert)
                } else {
                    background
                }
            }
            BlinkState::Idle => ArcAlert::ALL
                .iter()
                .rev()
                .find(|a| elapsed_minutes >= a.threshold())
                .map_or(base, |a| alert_color(*a)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mission() -> MissionState {
        MissionState::new(Duration::from_secs(40 * 60))
    }

    #[test]
    fn start_is_idempotent() {
        let mut m = mission();
        assert_eq!(m.phase(), MissionPhase::NotStarted);
        assert!(m.start());
        assert!(!m.start());
        assert_eq!(m.phase(), MissionPhase::Running);
    }

    #[test]
    fn ticks_do_nothing_before_start() {
        let mut m = mission();
        assert_eq!(m.tick(), None);
        assert_eq!(m.elapsed_minutes(), 0);
    }

    #[test]
    fn sixty_ticks_expire_the_mission() {
        let mut m = mission();
        m.start();
        for expected in 1..=60 {
            assert_eq!(m.tick(), Some(expected));
        }
        assert_eq!(m.phase(), MissionPhase::Expired);
        assert_eq!(m.tick(), None);
        assert_eq!(m.elapsed_minutes(), 60);
        assert!(!m.start());
    }

    #[test]
    fn override_to_sixty_expires_running_mission() {
        let mut m = mission();
        m.start();
        m.set_elapsed(60);
        assert_eq!(m.phase(), MissionPhase::Expired);

        let mut idle = mission();
        idle.set_elapsed(60);
        assert_eq!(idle.phase(), MissionPhase::NotStarted);
    }

    #[test]
    fn start_resets_an_earlier_elapsed_override() {
        for preset in [45, 60] {
            let mut m = mission();
            m.set_elapsed(preset);
            assert_eq!(m.phase(), MissionPhase::NotStarted);
            assert!(m.start());
            assert_eq!(m.phase(), MissionPhase::Running);
            assert_eq!(m.elapsed_minutes(), 0);
        }
    }

    #[test]
    fn mission_end_minute_truncates_seconds() {
        let m = MissionState::new(Duration::from_secs(40 * 60 + 59));
        assert_eq!(m.mission_end_minute(), 40);
    }

    #[test]
    fn elapsed_override_validation() {
        assert_eq!(parse_elapsed_override("45"), Ok(45));
        assert_eq!(parse_elapsed_override(" 0 "), Ok(0));
        assert_eq!(parse_elapsed_override("60"), Ok(60));
        assert_eq!(
            parse_elapsed_override("61"),
            Err(OverrideError::ElapsedOutOfRange(61))
        );
        assert_eq!(
            parse_elapsed_override("-1"),
            Err(OverrideError::ElapsedOutOfRange(-1))
        );
        assert_eq!(
            parse_elapsed_override("abc"),
            Err(OverrideError::InvalidElapsed("abc".into()))
        );
        assert!(parse_elapsed_override("4.5").is_err());
    }

    #[test]
    fn blink_runs_six_toggles_then_settles() {
        let mut blinker = ArcBlinker::new();
        let colors = |b: &ArcBlinker| {
            b.outline_color(20, Color::GREEN, Color::ORANGE, Color::RED, Color::BLACK)
        };
        assert_eq!(blinker.on_elapsed_changed(20), Some(ArcAlert::Warning));

        let mut seen = vec![colors(&blinker)];
        while blinker.step() {
            seen.push(colors(&blinker));
        }
        assert_eq!(
            seen,
            vec![
                Color::ORANGE,
                Color::BLACK,
                Color::ORANGE,
                Color::BLACK,
                Color::ORANGE,
                Color::BLACK,
            ]
        );
        assert_eq!(blinker.state(), BlinkState::Idle);
        assert_eq!(colors(&blinker), Color::ORANGE);
    }

    #[test]
    fn thresholds_fire_once_per_crossing() {
        let mut blinker = ArcBlinker::new();
        assert_eq!(blinker.on_elapsed_changed(19), None);
        assert_eq!(blinker.on_elapsed_changed(20), Some(ArcAlert::Warning));
        assert_eq!(blinker.on_elapsed_changed(21), None);
        assert_eq!(blinker.on_elapsed_changed(20), None);
        assert_eq!(blinker.on_elapsed_changed(30), Some(ArcAlert::Alert));
        assert_eq!(blinker.on_elapsed_changed(10), None);
        assert_eq!(blinker.on_elapsed_changed(20), Some(ArcAlert::Warning));
    }

    #[test]
    fn jump_across_both_thresholds_uses_alert() {
        let mut blinker = ArcBlinker::new();
        assert_eq!(blinker.on_elapsed_changed(45), Some(ArcAlert::Alert));
        assert_eq!(blinker.on_elapsed_changed(25), None);
    }

    #[test]
    fn settled_color_tracks_elapsed() {
        let blinker = ArcBlinker::new();
        let c = |m| blinker.outline_color(m, Color::GREEN, Color::ORANGE, Color::RED, Color::BLACK);
        assert_eq!(c(5), Color::GREEN);
        assert_eq!(c(25), Color::ORANGE);
        assert_eq!(c(30), Color::RED);
    }
}
