//! Clock-face geometry: ring radii and the angle mapping shared by every
//! element placed on the dial.
//!
//! Angles come in two flavours. Screen angles are radians measured clockwise
//! from 3 o'clock (the canvas y axis points down). Clock angles are degrees
//! measured clockwise from 12 o'clock; arcs are described in clock degrees.

/// Tolerance, in canvas units, around the waypoint ring within which a click
/// places a waypoint.
pub const WAYPOINT_TOLERANCE: f64 = 15.0;

/// Fraction of the waypoint ring radius at which markers are drawn.
pub const WAYPOINT_MARKER_FACTOR: f64 = 0.95;

/// Minutes in one revolution of the minute ring.
pub const MINUTES_PER_CYCLE: f64 = 60.0;

/// Hours in one revolution of the hour ring.
pub const HOURS_PER_CYCLE: f64 = 12.0;

/// A point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Radii and center of the concentric rings making up the dial.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryConfig {
    pub center_x: f64,
    pub center_y: f64,
    pub radius_outer: f64,
    pub radius_inner: f64,
    pub radius_waypoints: f64,
    pub radius_minute_ring: f64,
    pub radius_hour_ring: f64,
    pub radius_battery_ring: f64,
    pub radius_battery_boundary: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            center_x: 300.0,
            center_y: 300.0,
            radius_outer: 200.0,
            radius_inner: 150.0,
            radius_waypoints: 250.0,
            radius_minute_ring: 180.0,
            radius_hour_ring: 230.0,
            radius_battery_ring: 130.0,
            radius_battery_boundary: 140.0,
        }
    }
}

impl GeometryConfig {
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Point at `radius` along a screen angle (radians, clockwise from 3 o'clock).
    pub fn polar(&self, radius: f64, screen_angle: f64) -> Point {
        Point::new(
            self.center_x + radius * screen_angle.cos(),
            self.center_y + radius * screen_angle.sin(),
        )
    }

    /// Position of `value` in a cycle of length `cycle` at `radius`.
    pub fn clock_point(&self, value: f64, cycle: f64, radius: f64) -> Point {
        self.polar(radius, cycle_angle(value, cycle))
    }

    /// Position of a minute marker, using the `(minute - 135) * 6` degree form.
    pub fn minute_marker_point(&self, minute: f64, radius: f64) -> Point {
        self.polar(radius, minute_marker_angle(minute))
    }

    /// Radius of the stroke center of the elapsed-time arc.
    pub fn elapsed_arc_radius(&self) -> f64 {
        self.radius_outer - 20.0
    }

    /// Radius of the stroke center of the battery arc.
    pub fn battery_arc_radius(&self) -> f64 {
        self.radius_battery_ring + 10.0
    }

    /// Radius of the stroke center of the mission-duration arc.
    pub fn mission_arc_radius(&self) -> f64 {
        self.radius_minute_ring - 23.0
    }

    /// Radius midway between the minute and hour rings, where hour labels sit.
    pub fn hour_label_radius(&self) -> f64 {
        self.radius_minute_ring + (self.radius_hour_ring - self.radius_minute_ring) / 2.0
    }

    /// Whether a click at `click` lies inside the waypoint tolerance band.
    pub fn accepts_waypoint(&self, click: Point) -> bool {
        (click.distance_to(self.center()) - self.radius_waypoints).abs() < WAYPOINT_TOLERANCE
    }

    /// Where the marker for a click at `click` is drawn: on the waypoint
    /// ring's inner edge along the click direction.
    pub fn waypoint_anchor(&self, click: Point) -> Point {
        let angle = (click.y - self.center_y).atan2(click.x - self.center_x);
        self.polar(self.radius_waypoints * WAYPOINT_MARKER_FACTOR, angle)
    }
}

/// Screen angle for `value` in a cycle of length `cycle`: 0 at the top,
/// clockwise positive.
pub fn cycle_angle(value: f64, cycle: f64) -> f64 {
    ((value / cycle) * 360.0 - 90.0).to_radians()
}

/// Screen angle for a minute marker. Equal to `cycle_angle(minute, 60.0)`
/// modulo a full turn.
pub fn minute_marker_angle(minute: f64) -> f64 {
    ((minute - 135.0) * 6.0).to_radians()
}

/// Screen angle for a clock angle in degrees.
pub fn clock_degrees_to_screen(degrees: f64) -> f64 {
    (degrees - 90.0).to_radians()
}

/// Sweep of the elapsed-time arc in canvas degrees; negative is clockwise.
pub fn elapsed_sweep_degrees(elapsed_minutes: u32) -> f64 {
    -(f64::from(elapsed_minutes) / MINUTES_PER_CYCLE) * 360.0
}

/// Unclamped battery extent, `360 * (1 - elapsed / depletion)`.
pub fn battery_extent_raw(elapsed_minutes: u32, depletion_minutes: u32) -> f64 {
    if depletion_minutes == 0 {
        return 0.0;
    }
    360.0 * (1.0 - f64::from(elapsed_minutes) / f64::from(depletion_minutes))
}

/// Battery extent clamped to a drawable sweep. Past the depletion minute the
/// arc is simply empty.
pub fn battery_extent_degrees(elapsed_minutes: u32, depletion_minutes: u32) -> f64 {
    battery_extent_raw(elapsed_minutes, depletion_minutes).clamp(0.0, 360.0)
}

/// Clockwise extent of the mission-duration highlight arc starting at
/// `start_minute`, in clock degrees.
pub fn mission_arc_span(start_minute: u32, duration_minutes: u64) -> (f64, f64) {
    let start = f64::from(start_minute) * 6.0;
    let extent = (duration_minutes as f64 * 6.0).min(360.0);
    (start, extent)
}

/// Minutes elapsed since midnight for a time of day.
pub fn minutes_of_day(hour: u32, minute: u32) -> u32 {
    hour * 60 + minute
}

/// Whether a sun event at `sun_minutes` past midnight falls inside the
/// mission window ending at `mission_end_minutes`.
pub fn sun_marker_visible(sun_minutes: u32, mission_end_minutes: u64) -> bool {
    u64::from(sun_minutes) <= mission_end_minutes
}

/// Value on the hour ring for a time: `hour % 12 + minute / 60`.
pub fn hour_hand_value(hour: u32, minute: u32) -> f64 {
    f64::from(hour % 12) + f64::from(minute) / 60.0
}

/// Value on the minute ring for a time: `minute + second / 60`.
pub fn minute_hand_value(minute: u32, second: u32) -> f64 {
    f64::from(minute) + f64::from(second) / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn twelve_o_clock_is_top_of_circle() {
        let g = GeometryConfig::default();
        let p = g.clock_point(0.0, MINUTES_PER_CYCLE, 100.0);
        assert!(close(p.x, 300.0));
        assert!(close(p.y, 200.0));

        let quarter = g.clock_point(15.0, MINUTES_PER_CYCLE, 100.0);
        assert!(close(quarter.x, 400.0));
        assert!(close(quarter.y, 300.0));

        let three = g.clock_point(3.0, HOURS_PER_CYCLE, 100.0);
        assert!(close(three.x, 400.0));
        assert!(close(three.y, 300.0));
    }

    #[test]
    fn minute_marker_form_matches_cycle_form() {
        let g = GeometryConfig::default();
        for minute in 0..60 {
            let a = g.minute_marker_point(f64::from(minute), g.radius_minute_ring);
            let b = g.clock_point(f64::from(minute), MINUTES_PER_CYCLE, g.radius_minute_ring);
            assert!(a.distance_to(b) < 1e-6, "minute {minute}");
        }
    }

    #[test]
    fn elapsed_sweep_grows_clockwise() {
        assert_eq!(elapsed_sweep_degrees(0), 0.0);
        assert!((elapsed_sweep_degrees(15) + 90.0).abs() < EPS);
        assert!((elapsed_sweep_degrees(60) + 360.0).abs() < EPS);
        for m in 1..=60 {
            assert!(elapsed_sweep_degrees(m).abs() > elapsed_sweep_degrees(m - 1).abs());
        }
    }

    #[test]
    fn battery_extent_follows_depletion_and_clamps() {
        assert!((battery_extent_degrees(0, 40) - 360.0).abs() < EPS);
        assert!((battery_extent_degrees(20, 40) - 180.0).abs() < EPS);
        assert_eq!(battery_extent_degrees(40, 40), 0.0);
        assert!(battery_extent_raw(50, 40) < 0.0);
        assert_eq!(battery_extent_degrees(50, 40), 0.0);
        assert!((battery_extent_degrees(30, 60) - 180.0).abs() < EPS);
        assert_eq!(battery_extent_degrees(10, 0), 0.0);
    }

    #[test]
    fn waypoint_band_is_open_interval() {
        let g = GeometryConfig::default();
        assert!(g.accepts_waypoint(Point::new(300.0 + 248.0, 300.0)));
        assert!(g.accepts_waypoint(Point::new(300.0, 300.0 - 264.0)));
        assert!(!g.accepts_waypoint(Point::new(300.0 + 230.0, 300.0)));
        assert!(!g.accepts_waypoint(Point::new(300.0 + 265.0, 300.0)));
        assert!(!g.accepts_waypoint(Point::new(300.0, 300.0)));
    }

    #[test]
    fn waypoint_anchor_is_projected_onto_ring() {
        let g = GeometryConfig::default();
        let anchor = g.waypoint_anchor(Point::new(300.0, 300.0 + 260.0));
        assert!(close(anchor.x, 300.0));
        assert!(close(anchor.y, 300.0 + 237.5));
    }

    #[test]
    fn mission_arc_is_capped_at_full_turn() {
        assert_eq!(mission_arc_span(0, 40), (0.0, 240.0));
        assert_eq!(mission_arc_span(0, 90), (0.0, 360.0));
        assert_eq!(mission_arc_span(5, 10), (30.0, 60.0));
    }

    #[test]
    fn sun_marker_boundary_is_inclusive() {
        assert!(sun_marker_visible(40, 40));
        assert!(!sun_marker_visible(41, 40));
        assert!(!sun_marker_visible(minutes_of_day(5, 30), 40));
        assert!(!sun_marker_visible(minutes_of_day(21, 30), 40));
        assert!(sun_marker_visible(minutes_of_day(0, 12), 40));
    }

    #[test]
    fn hand_values() {
        assert!((hour_hand_value(15, 30) - 3.5).abs() < EPS);
        assert!((hour_hand_value(0, 0)).abs() < EPS);
        assert!((minute_hand_value(30, 30) - 30.5).abs() < EPS);
    }
}
