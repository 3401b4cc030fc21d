// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

use crate::color::Color;
use crate::geometry::Point;
use crate::raster::Canvas;
use crate::text::TextRenderer;

/// One drawing primitive in canvas coordinates.
///
/// Arc angles are clock degrees: 0 at 12 o'clock, increasing clockwise.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Ring {
        center: Point,
        radius: f64,
        thickness: f32,
        dash: Option<(f64, f64)>,
        color: Color,
    },
    Arc {
        center: Point,
        radius: f64,
        thickness: f32,
        start_degrees: f64,
        sweep_degrees: f64,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        thickness: f32,
        color: Color,
    },
    Triangle {
        points: [Point; 3],
        fill: Color,
        outline: Color,
    },
    Rect {
        top_left: Point,
        size: (f64, f64),
        fill: Option<Color>,
        outline: Color,
    },
    Text {
        position: Point,
        text: String,
        font_size: f32,
        color: Color,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn render(&self, canvas: &mut Canvas, text: &TextRenderer) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => {
                    canvas.clear(*color);
                }
                DrawCommand::Ring {
                    center,
                    radius,
                    thickness,
                    dash,
                    color,
                } => {
                    canvas.draw_ring(*center, *radius, *thickness, *dash, *color);
                }
                DrawCommand::Arc {
                    center,
                    radius,
                    thickness,
                    start_degrees,
                    sweep_degrees,
                    color,
                } => {
                    canvas.draw_arc(
                        *center,
                        *radius,
                        *thickness,
                        *start_degrees,
                        *sweep_degrees,
                        *color,
                    );
                }
                DrawCommand::Line {
                    from,
                    to,
                    thickness,
                    color,
                } => {
                    canvas.draw_thick_line_aa(*from, *to, *thickness, *color);
                }
                DrawCommand::Triangle {
                    points,
                    fill,
                    outline,
                } => {
                    canvas.fill_triangle(points, *fill);
                    for i in 0..3 {
                        canvas.draw_thick_line_aa(points[i], points[(i + 1) % 3], 1.0, *outline);
                    }
                }
                DrawCommand::Rect {
                    top_left,
                    size,
                    fill,
                    outline,
                } => {
                    if let Some(fill) = fill {
                        canvas.fill_rect(*top_left, *size, *fill);
                    }
                    canvas.stroke_rect(*top_left, *size, *outline);
                }
                DrawCommand::Text {
                    position,
                    text: label,
                    font_size,
                    color,
                } => {
                    text.draw(canvas, *position, label, *font_size, *color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_keep_insertion_order() {
        let mut scene = Scene::new();
        assert!(scene.is_empty());
        scene.add_command(DrawCommand::Clear(Color::BLACK));
        scene.add_command(DrawCommand::Line {
            from: Point::new(0.0, 0.0),
            to: Point::new(4.0, 4.0),
            thickness: 1.0,
            color: Color::WHITE,
        });
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.commands()[0], DrawCommand::Clear(Color::BLACK));
    }

    #[test]
    fn render_paints_the_frame() {
        let mut frame = vec![0u8; 20 * 20 * 4];
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::Clear(Color::BLUE));
        scene.add_command(DrawCommand::Rect {
            top_left: Point::new(2.0, 2.0),
            size: (5.0, 5.0),
            fill: Some(Color::RED),
            outline: Color::RED,
        });
        let mut canvas = Canvas::new(&mut frame, 20, 20);
        scene.render(&mut canvas, &TextRenderer::Mono);
        let px = |x: usize, y: usize| &frame[(y * 20 + x) * 4..(y * 20 + x) * 4 + 3];
        assert_eq!(px(0, 0), &[0x00, 0x00, 0xff]);
        assert_eq!(px(4, 4), &[0xff, 0x00, 0x00]);
    }
}
