//! The mission clock face.
//!
//! [`ClockView`] owns the mission state, the displayed time, waypoints and
//! the three cooperative timers. It never draws directly: it describes the
//! face as [`Scene`]s which the host rasterizes in order
//! (background, arcs, overlay, marks).

use std::time::Duration;

use chrono::NaiveDateTime;
use chrono::Timelike;

use crate::clock::{parse_time_override, DisplayTime, SystemClock, WallClock};
use crate::color::Palette;
use crate::command::ClockCommand;
use crate::config::MissionClockConfig;
use crate::error::OverrideError;
use crate::geometry::{
    battery_extent_degrees, clock_degrees_to_screen, cycle_angle, elapsed_sweep_degrees,
    hour_hand_value, minute_hand_value, mission_arc_span, sun_marker_visible, GeometryConfig,
    Point, HOURS_PER_CYCLE, MINUTES_PER_CYCLE,
};
use crate::mission::{parse_elapsed_override, ArcBlinker, BlinkState, MissionPhase, MissionState};
use crate::scene::{DrawCommand, Scene};
use crate::sun::{SunTimeProvider, SunTimes};
use crate::text::points;
use crate::timers::{earliest, PeriodicTimer, BLINK_TICK, CLOCK_TICK, MISSION_TICK};

/// Edge length of a waypoint marker.
pub const WAYPOINT_SIZE: f64 = 10.0;

/// Radius of the sunrise/sunset ring markers.
pub const SUN_MARKER_RADIUS: f64 = 10.0;

/// A marker placed on the waypoint ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub position: Point,
}

impl Waypoint {
    /// Triangle corners: apex up, base below.
    pub fn marker(&self) -> [Point; 3] {
        let Point { x, y } = self.position;
        let half = WAYPOINT_SIZE / 2.0;
        [
            Point::new(x, y - half),
            Point::new(x - half, y + half),
            Point::new(x + half, y + half),
        ]
    }
}

pub struct ClockView<C: WallClock = SystemClock> {
    geometry: GeometryConfig,
    palette: Palette,
    mission: MissionState,
    battery_depletion_minutes: u32,
    sun: SunTimes,
    waypoints: Vec<Waypoint>,
    display: DisplayTime,
    shown_time: Option<NaiveDateTime>,
    blinker: ArcBlinker,
    mission_timer: PeriodicTimer,
    clock_timer: PeriodicTimer,
    blink_timer: PeriodicTimer,
    wall_clock: C,
    static_background: Scene,
    static_overlay: Scene,
    dirty: bool,
}

impl<C: WallClock> ClockView<C> {
    /// Build the view. Sun times are computed once for today's date; a
    /// provider failure falls back to the configured defaults.
    pub fn new(config: &MissionClockConfig, sun_provider: &dyn SunTimeProvider, wall_clock: C) -> Self {
        let today = wall_clock.now().date();
        let sun = SunTimes::resolve(
            sun_provider,
            config.latitude,
            config.longitude,
            today,
            config.sun_fallback,
        );
        let mission = MissionState::new(config.mission_duration);

        let mut view = Self {
            geometry: config.geometry.clone(),
            palette: config.palette.clone(),
            mission,
            battery_depletion_minutes: config.battery_depletion_minutes,
            sun,
            waypoints: Vec::new(),
            display: DisplayTime::Live,
            shown_time: None,
            blinker: ArcBlinker::new(),
            mission_timer: PeriodicTimer::new(MISSION_TICK),
            clock_timer: PeriodicTimer::new(CLOCK_TICK),
            blink_timer: PeriodicTimer::new(BLINK_TICK),
            wall_clock,
            static_background: Scene::new(),
            static_overlay: Scene::new(),
            dirty: true,
        };
        view.static_background = view.build_static_background();
        view.static_overlay = view.build_static_overlay();
        tracing::info!(
            latitude = config.latitude,
            longitude = config.longitude,
            mission_minutes = view.mission.mission_end_minute(),
            "Mission clock ready"
        );
        view
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Start the mission. Returns `false` if it had already been started.
    pub fn start(&mut self, now: Duration) -> bool {
        if !self.mission.start() {
            tracing::debug!(phase = ?self.mission.phase(), "Start ignored");
            return false;
        }
        tracing::info!("Mission started");
        self.blinker = ArcBlinker::new();
        self.blink_timer.disarm();
        self.mission_timer.arm(now);
        if self.display == DisplayTime::Live {
            self.shown_time = Some(self.wall_clock.now());
            self.clock_timer.arm(now);
        }
        self.dirty = true;
        true
    }

    /// Place a waypoint if `click` lies on the waypoint ring.
    pub fn click(&mut self, click: Point) -> Option<Waypoint> {
        if !self.geometry.accepts_waypoint(click) {
            tracing::debug!(x = click.x, y = click.y, "Click outside waypoint ring");
            return None;
        }
        let waypoint = Waypoint {
            position: self.geometry.waypoint_anchor(click),
        };
        tracing::info!(
            x = waypoint.position.x,
            y = waypoint.position.y,
            "Waypoint added"
        );
        self.waypoints.push(waypoint);
        self.dirty = true;
        Some(waypoint)
    }

    /// Freeze the displayed time at `HH:MM` today.
    pub fn override_time(&mut self, input: &str) -> Result<NaiveDateTime, OverrideError> {
        let time = parse_time_override(input).inspect_err(|e| tracing::warn!("{e}"))?;
        let frozen = self.wall_clock.now().date().and_time(time);
        self.display = DisplayTime::Overridden(frozen);
        self.shown_time = Some(frozen);
        self.clock_timer.disarm();
        self.dirty = true;
        tracing::info!(time = %frozen.format("%H:%M"), "Time override applied");
        Ok(frozen)
    }

    /// Return to the live wall clock. The one-second refresh resumes at once
    /// if the mission clock has been started. Returns `false` if no override
    /// was active.
    pub fn clear_time_override(&mut self, now: Duration) -> bool {
        if !self.display.is_overridden() {
            return false;
        }
        self.display = DisplayTime::Live;
        if self.mission.phase() == MissionPhase::NotStarted {
            self.shown_time = None;
        } else {
            self.shown_time = Some(self.wall_clock.now());
            self.clock_timer.arm(now);
        }
        self.dirty = true;
        tracing::info!("Time override cleared");
        true
    }

    /// Replace the elapsed-minutes counter.
    pub fn override_elapsed(&mut self, input: &str, now: Duration) -> Result<u32, OverrideError> {
        let minutes = parse_elapsed_override(input).inspect_err(|e| tracing::warn!("{e}"))?;
        self.mission.set_elapsed(minutes);
        if !self.mission.is_running() {
            self.mission_timer.disarm();
        }
        self.elapsed_changed(now);
        self.dirty = true;
        tracing::info!(elapsed = minutes, phase = ?self.mission.phase(), "Elapsed override applied");
        Ok(minutes)
    }

    /// Apply one command. `Ok(false)` means it was valid but changed nothing:
    /// a repeated or late start, a click off the ring, or going live while
    /// already live.
    pub fn apply(&mut self, command: ClockCommand, now: Duration) -> Result<bool, OverrideError> {
        let changed = match command {
            ClockCommand::Start => self.start(now),
            ClockCommand::Click { x, y } => self.click(Point::new(x, y)).is_some(),
            ClockCommand::OverrideTime(input) => {
                self.override_time(&input)?;
                true
            }
            ClockCommand::ClearTimeOverride => self.clear_time_override(now),
            ClockCommand::OverrideElapsed(input) => {
                self.override_elapsed(&input, now)?;
                true
            }
        };
        Ok(changed)
    }

    // ------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------

    /// Run every timer that has come due by `now`. Returns `true` if the
    /// face changed since the last call.
    pub fn advance(&mut self, now: Duration) -> bool {
        while self.mission_timer.poll(now) {
            self.on_mission_tick(now);
        }
        while self.clock_timer.poll(now) {
            if let DisplayTime::Live = self.display {
                self.shown_time = Some(self.wall_clock.now());
            }
            self.dirty = true;
        }
        while self.blink_timer.poll(now) {
            if !self.blinker.step() {
                self.blink_timer.disarm();
            }
            self.dirty = true;
        }
        std::mem::take(&mut self.dirty)
    }

    /// When the next timer is due, if any is armed.
    pub fn next_deadline(&self) -> Option<Duration> {
        earliest([
            self.mission_timer.next_due(),
            self.clock_timer.next_due(),
            self.blink_timer.next_due(),
        ])
    }

    fn on_mission_tick(&mut self, now: Duration) {
        if let Some(elapsed) = self.mission.tick() {
            tracing::debug!(elapsed, "Mission tick");
            self.elapsed_changed(now);
            if let DisplayTime::Live = self.display {
                self.shown_time = Some(self.wall_clock.now());
            }
            self.dirty = true;
        }
        if !self.mission.is_running() {
            self.mission_timer.disarm();
            tracing::info!(elapsed = self.mission.elapsed_minutes(), "Mission time expired");
        }
    }

    fn elapsed_changed(&mut self, now: Duration) {
        if let Some(alert) = self.blinker.on_elapsed_changed(self.mission.elapsed_minutes()) {
            tracing::info!(?alert, threshold = alert.threshold(), "Elapsed arc alert");
            self.blink_timer.arm(now);
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn elapsed_minutes(&self) -> u32 {
        self.mission.elapsed_minutes()
    }

    pub fn phase(&self) -> MissionPhase {
        self.mission.phase()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn display(&self) -> DisplayTime {
        self.display
    }

    /// Time currently shown by the pointers and readout.
    pub fn display_time(&self) -> Option<NaiveDateTime> {
        self.shown_time
    }

    pub fn sun_times(&self) -> SunTimes {
        self.sun
    }

    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    pub fn blink_state(&self) -> BlinkState {
        self.blinker.state()
    }

    pub fn elapsed_arc_color(&self) -> crate::color::Color {
        self.blinker.outline_color(
            self.mission.elapsed_minutes(),
            self.palette.elapsed_arc,
            self.palette.warning,
            self.palette.alert,
            self.palette.background,
        )
    }

    // ------------------------------------------------------------------
    // Scenes
    // ------------------------------------------------------------------

    /// Rings drawn beneath the arcs.
    pub fn static_background(&self) -> &Scene {
        &self.static_background
    }

    /// Labels, ticks and highlights drawn above the arcs.
    pub fn static_overlay(&self) -> &Scene {
        &self.static_overlay
    }

    /// Elapsed-time and battery arcs.
    pub fn dynamic_arcs(&self) -> Scene {
        let g = &self.geometry;
        let center = g.center();
        let elapsed = self.mission.elapsed_minutes();
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::Arc {
            center,
            radius: g.elapsed_arc_radius(),
            thickness: 20.0,
            start_degrees: 0.0,
            sweep_degrees: -elapsed_sweep_degrees(elapsed),
            color: self.elapsed_arc_color(),
        });
        scene.add_command(DrawCommand::Arc {
            center,
            radius: g.battery_arc_radius(),
            thickness: 15.0,
            start_degrees: 0.0,
            sweep_degrees: battery_extent_degrees(elapsed, self.battery_depletion_minutes),
            color: self.palette.battery_arc,
        });
        scene
    }

    /// Digital readout, pointers and waypoints.
    pub fn dynamic_marks(&self) -> Scene {
        let g = &self.geometry;
        let mut scene = Scene::new();

        if let Some(time) = self.shown_time {
            scene.add_command(DrawCommand::Text {
                position: g.center(),
                text: time.format("%H:%M:%S").to_string(),
                font_size: points(15.0),
                color: self.palette.foreground,
            });

            let hour = cycle_angle(hour_hand_value(time.hour(), time.minute()), HOURS_PER_CYCLE);
            scene.add_command(DrawCommand::Line {
                from: g.polar(g.radius_minute_ring + 13.0, hour),
                to: g.polar(g.radius_hour_ring - 12.0, hour),
                thickness: 5.0,
                color: self.palette.pointer,
            });

            let minute = cycle_angle(minute_hand_value(time.minute(), time.second()), MINUTES_PER_CYCLE);
            scene.add_command(DrawCommand::Line {
                from: g.polar(g.radius_inner + 10.0, minute),
                to: g.polar(g.radius_minute_ring, minute),
                thickness: 3.0,
                color: self.palette.pointer,
            });
        }

        for waypoint in &self.waypoints {
            scene.add_command(DrawCommand::Triangle {
                points: waypoint.marker(),
                fill: self.palette.waypoint_fill,
                outline: self.palette.waypoint_outline,
            });
        }
        scene
    }

    fn build_static_background(&self) -> Scene {
        let g = &self.geometry;
        let p = &self.palette;
        let center = g.center();
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::Clear(p.background));
        for (radius, thickness) in [
            (g.radius_outer - 9.0, 1.0),
            (g.radius_inner, 1.0),
            (g.radius_battery_boundary - 10.0, 2.0),
        ] {
            scene.add_command(DrawCommand::Ring {
                center,
                radius,
                thickness,
                dash: None,
                color: p.foreground,
            });
        }
        scene
    }

    fn build_static_overlay(&self) -> Scene {
        let g = &self.geometry;
        let p = &self.palette;
        let center = g.center();
        let mut scene = Scene::new();

        // Battery scale
        let battery_label_radius = g.radius_battery_ring + 10.0;
        for (position, label) in [
            (Point::new(center.x, center.y - battery_label_radius), "100%"),
            (Point::new(center.x, center.y + battery_label_radius), "50%"),
        ] {
            scene.add_command(DrawCommand::Text {
                position,
                text: label.to_string(),
                font_size: points(10.0),
                color: p.foreground,
            });
        }
        for degrees in (0..360).step_by(36) {
            let angle = clock_degrees_to_screen(f64::from(degrees));
            scene.add_command(DrawCommand::Line {
                from: g.polar(g.radius_battery_ring + 15.0, angle),
                to: g.polar(g.radius_battery_ring, angle),
                thickness: 1.0,
                color: p.foreground,
            });
        }

        // Sun times
        for (dy, text, color) in [
            (
                -(g.radius_inner - 50.0),
                format!("Sunrise: {}", self.sun.sunrise.format("%H:%M")),
                p.sunrise,
            ),
            (
                g.radius_inner - 50.0,
                format!("Sunset: {}", self.sun.sunset.format("%H:%M")),
                p.sunset,
            ),
        ] {
            scene.add_command(DrawCommand::Text {
                position: Point::new(center.x, center.y + dy),
                text,
                font_size: points(12.0),
                color,
            });
        }

        scene.add_command(DrawCommand::Ring {
            center,
            radius: g.radius_waypoints,
            thickness: 2.0,
            dash: Some((4.0, 2.0)),
            color: p.foreground,
        });

        // Minute ring: labels every five minutes, ticks in between
        for minute in 0..60u32 {
            let m = f64::from(minute);
            if minute % 5 == 0 {
                scene.add_command(DrawCommand::Text {
                    position: g.minute_marker_point(m, g.radius_minute_ring),
                    text: minute.to_string(),
                    font_size: points(12.0),
                    color: p.foreground,
                });
            } else {
                scene.add_command(DrawCommand::Line {
                    from: g.minute_marker_point(m, g.radius_minute_ring - 5.0),
                    to: g.minute_marker_point(m, g.radius_minute_ring),
                    thickness: 1.0,
                    color: p.foreground,
                });
            }
        }

        for hour in 1..=12u32 {
            scene.add_command(DrawCommand::Text {
                position: g.clock_point(f64::from(hour), HOURS_PER_CYCLE, g.hour_label_radius()),
                text: hour.to_string(),
                font_size: points(12.0),
                color: p.foreground,
            });
        }

        scene.add_command(DrawCommand::Ring {
            center,
            radius: g.radius_hour_ring - 12.0,
            thickness: 2.0,
            dash: None,
            color: p.foreground,
        });

        let (start_degrees, sweep_degrees) = mission_arc_span(0, self.mission.mission_end_minute());
        scene.add_command(DrawCommand::Arc {
            center,
            radius: g.mission_arc_radius(),
            thickness: 15.0,
            start_degrees,
            sweep_degrees,
            color: p.mission_arc,
        });

        let mission_end = self.mission.mission_end_minute();
        for (sun_minutes, color) in [
            (self.sun.sunrise_minutes(), p.sunrise),
            (self.sun.sunset_minutes(), p.sunset),
        ] {
            if sun_marker_visible(sun_minutes, mission_end) {
                scene.add_command(DrawCommand::Ring {
                    center: g.minute_marker_point(f64::from(sun_minutes % 60), g.radius_minute_ring + 15.0),
                    radius: SUN_MARKER_RADIUS,
                    thickness: 3.0,
                    dash: None,
                    color,
                });
            }
        }

        scene
    }
}
