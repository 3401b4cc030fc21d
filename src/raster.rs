// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

use crate::color::Color;
use crate::geometry::Point;

/// An RGBA framebuffer, optionally restricted to a viewport.
///
/// Drawing coordinates are relative to the viewport origin and anything
/// outside the viewport is clipped.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    origin: (i32, i32),
    size: (usize, usize),
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
            origin: (0, 0),
            size: (width, height),
        }
    }

    /// A sub-canvas whose origin sits at `origin` in this canvas.
    pub fn viewport(&mut self, origin: (i32, i32), size: (usize, usize)) -> Canvas<'_> {
        Canvas {
            frame: &mut *self.frame,
            width: self.width,
            height: self.height,
            origin: (self.origin.0 + origin.0, self.origin.1 + origin.1),
            size,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.size
    }

    pub fn clear(&mut self, color: Color) {
        let (w, h) = self.size;
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                self.put(x, y, color);
            }
        }
    }

    fn frame_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.size.0 || y as usize >= self.size.1 {
            return None;
        }
        let fx = x + self.origin.0;
        let fy = y + self.origin.1;
        if fx < 0 || fy < 0 || fx as usize >= self.width || fy as usize >= self.height {
            return None;
        }
        let idx = (fy as usize * self.width + fx as usize) * 4;
        (idx + 4 <= self.frame.len()).then_some(idx)
    }

    fn put(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.frame_index(x, y) {
            self.frame[idx..idx + 4].copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    /// Blend `color` over the pixel at `(x, y)` with coverage `alpha`.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        let Some(idx) = self.frame_index(x, y) else {
            return;
        };
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.r as f32, color.g as f32, color.b as f32];
        let out = [
            (src[0] * a + self.frame[idx] as f32 * (1.0 - a)).round() as u8,
            (src[1] * a + self.frame[idx + 1] as f32 * (1.0 - a)).round() as u8,
            (src[2] * a + self.frame[idx + 2] as f32 * (1.0 - a)).round() as u8,
            0xff,
        ];
        self.frame[idx..idx + 4].copy_from_slice(&out);
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.frame_index(x, y)
            .map(|idx| Color::new(self.frame[idx], self.frame[idx + 1], self.frame[idx + 2]))
    }

    pub fn draw_thick_line_aa(&mut self, from: Point, to: Point, thickness: f32, color: Color) {
        let pad = f64::from(thickness).ceil() + 1.0;
        let min_x = (from.x.min(to.x) - pad).floor() as i32;
        let max_x = (from.x.max(to.x) + pad).ceil() as i32;
        let min_y = (from.y.min(to.y) - pad).floor() as i32;
        let max_y = (from.y.max(to.y) + pad).ceil() as i32;
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let len_sq = dx * dx + dy * dy;
        let half = f64::from(thickness) / 2.0;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = f64::from(x) - from.x;
                let py = f64::from(y) - from.y;
                let t = if len_sq > 0.0 {
                    ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let lx = from.x + t * dx;
                let ly = from.y + t * dy;
                let dist = (lx - f64::from(x)).hypot(ly - f64::from(y));
                let aa = (1.0 - (dist - half).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.set_pixel(x, y, color, aa as f32);
                }
            }
        }
    }

    /// Circle outline of stroke `thickness` centered on `radius`, optionally
    /// dashed with `(on, off)` lengths measured along the circumference.
    pub fn draw_ring(
        &mut self,
        center: Point,
        radius: f64,
        thickness: f32,
        dash: Option<(f64, f64)>,
        color: Color,
    ) {
        self.draw_band(center, radius, thickness, color, |clock_degrees| {
            dash.map_or(true, |(on, off)| {
                let s = clock_degrees.to_radians() * radius;
                s.rem_euclid(on + off) < on
            })
        });
    }

    /// Arc band from `start_degrees` sweeping `sweep_degrees` clockwise.
    /// A negative sweep runs counter-clockwise from the start.
    pub fn draw_arc(
        &mut self,
        center: Point,
        radius: f64,
        thickness: f32,
        start_degrees: f64,
        sweep_degrees: f64,
        color: Color,
    ) {
        if sweep_degrees == 0.0 {
            return;
        }
        let (start, sweep) = if sweep_degrees < 0.0 {
            (start_degrees + sweep_degrees, -sweep_degrees)
        } else {
            (start_degrees, sweep_degrees)
        };
        if sweep >= 360.0 {
            self.draw_ring(center, radius, thickness, None, color);
            return;
        }
        self.draw_band(center, radius, thickness, color, |clock_degrees| {
            (clock_degrees - start).rem_euclid(360.0) <= sweep
        });
    }

    fn draw_band(
        &mut self,
        center: Point,
        radius: f64,
        thickness: f32,
        color: Color,
        include: impl Fn(f64) -> bool,
    ) {
        let half = f64::from(thickness) / 2.0;
        let inner = (radius - half).max(0.0);
        let outer = radius + half;
        let min_x = (center.x - outer - 1.0).floor() as i32;
        let max_x = (center.x + outer + 1.0).ceil() as i32;
        let min_y = (center.y - outer - 1.0).floor() as i32;
        let max_y = (center.y + outer + 1.0).ceil() as i32;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = f64::from(x) - center.x;
                let dy = f64::from(y) - center.y;
                let dist = dx.hypot(dy);
                let aa = (outer + 0.5 - dist).clamp(0.0, 1.0) * (dist - inner + 0.5).clamp(0.0, 1.0);
                if aa <= 0.01 {
                    continue;
                }
                let clock_degrees = (dy.atan2(dx).to_degrees() + 90.0).rem_euclid(360.0);
                if include(clock_degrees) {
                    self.set_pixel(x, y, color, aa as f32);
                }
            }
        }
    }

    pub fn fill_triangle(&mut self, points: &[Point; 3], color: Color) {
        let [a, b, c] = *points;
        let edge = |p: Point, q: Point, x: f64, y: f64| (q.x - p.x) * (y - p.y) - (q.y - p.y) * (x - p.x);
        let area = edge(a, b, c.x, c.y);
        if area == 0.0 {
            return;
        }
        let min_x = a.x.min(b.x).min(c.x).floor() as i32;
        let max_x = a.x.max(b.x).max(c.x).ceil() as i32;
        let min_y = a.y.min(b.y).min(c.y).floor() as i32;
        let max_y = a.y.max(b.y).max(c.y).ceil() as i32;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let (px, py) = (f64::from(x), f64::from(y));
                let w0 = edge(b, c, px, py) * area.signum();
                let w1 = edge(c, a, px, py) * area.signum();
                let w2 = edge(a, b, px, py) * area.signum();
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.set_pixel(x, y, color, 1.0);
                }
            }
        }
    }

    pub fn fill_rect(&mut self, top_left: Point, size: (f64, f64), color: Color) {
        let x0 = top_left.x.round() as i32;
        let y0 = top_left.y.round() as i32;
        let x1 = (top_left.x + size.0).round() as i32;
        let y1 = (top_left.y + size.1).round() as i32;
        for y in y0..y1 {
            for x in x0..x1 {
                self.put(x, y, color);
            }
        }
    }

    pub fn stroke_rect(&mut self, top_left: Point, size: (f64, f64), color: Color) {
        let (x0, y0) = (top_left.x, top_left.y);
        let (x1, y1) = (top_left.x + size.0, top_left.y + size.1);
        for (from, to) in [
            ((x0, y0), (x1, y0)),
            ((x0, y1), (x1, y1)),
            ((x0, y0), (x0, y1)),
            ((x1, y0), (x1, y1)),
        ] {
            self.draw_thick_line_aa(
                Point::new(from.0, from.1),
                Point::new(to.0, to.1),
                1.0,
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(size: usize) -> Vec<u8> {
        vec![0u8; size * size * 4]
    }

    #[test]
    fn viewport_translates_and_clips() {
        let mut frame = blank(10);
        {
            let mut canvas = Canvas::new(&mut frame, 10, 10);
            let mut view = canvas.viewport((5, 5), (3, 3));
            view.clear(Color::WHITE);
            view.set_pixel(10, 10, Color::RED, 1.0);
        }
        let canvas = Canvas::new(&mut frame, 10, 10);
        assert_eq!(canvas.pixel(5, 5), Some(Color::WHITE));
        assert_eq!(canvas.pixel(7, 7), Some(Color::WHITE));
        assert_eq!(canvas.pixel(8, 8), Some(Color::BLACK));
        assert_eq!(canvas.pixel(4, 4), Some(Color::BLACK));
    }

    #[test]
    fn arc_covers_only_its_sweep() {
        let mut frame = blank(100);
        let mut canvas = Canvas::new(&mut frame, 100, 100);
        let center = Point::new(50.0, 50.0);
        // First quarter clockwise from 12 o'clock: the upper-right quadrant.
        canvas.draw_arc(center, 30.0, 6.0, 0.0, 90.0, Color::GREEN);
        assert_eq!(canvas.pixel(71, 29), Some(Color::GREEN));
        assert_eq!(canvas.pixel(29, 71), Some(Color::BLACK));
        assert_eq!(canvas.pixel(29, 29), Some(Color::BLACK));
    }

    #[test]
    fn negative_sweep_runs_counter_clockwise() {
        let mut frame = blank(100);
        let mut canvas = Canvas::new(&mut frame, 100, 100);
        canvas.draw_arc(Point::new(50.0, 50.0), 30.0, 6.0, 0.0, -90.0, Color::GREEN);
        assert_eq!(canvas.pixel(29, 29), Some(Color::GREEN));
        assert_eq!(canvas.pixel(71, 29), Some(Color::BLACK));
    }

    #[test]
    fn triangle_fill_is_winding_independent() {
        let mut frame = blank(20);
        let mut canvas = Canvas::new(&mut frame, 20, 20);
        let pts = [Point::new(10.0, 2.0), Point::new(2.0, 18.0), Point::new(18.0, 18.0)];
        canvas.fill_triangle(&pts, Color::YELLOW);
        assert_eq!(canvas.pixel(10, 12), Some(Color::YELLOW));
        let reversed = [pts[2], pts[1], pts[0]];
        canvas.clear(Color::BLACK);
        canvas.fill_triangle(&reversed, Color::YELLOW);
        assert_eq!(canvas.pixel(10, 12), Some(Color::YELLOW));
        assert_eq!(canvas.pixel(1, 1), Some(Color::BLACK));
    }

    #[test]
    fn dashed_ring_has_gaps() {
        let mut frame = blank(100);
        let mut canvas = Canvas::new(&mut frame, 100, 100);
        canvas.draw_ring(Point::new(50.0, 50.0), 40.0, 2.0, Some((4.0, 2.0)), Color::WHITE);
        let lit = (0..360)
            .filter(|deg| {
                let a = (f64::from(*deg) - 90.0).to_radians();
                let x = (50.0 + 40.0 * a.cos()).round() as i32;
                let y = (50.0 + 40.0 * a.sin()).round() as i32;
                canvas.pixel(x, y) != Some(Color::BLACK)
            })
            .count();
        assert!(lit > 150 && lit < 350, "lit samples: {lit}");
    }
}
