//! Text rendering.
//!
//! Labels are drawn with a TrueType/OpenType font through `rusttype` when one
//! can be found. Without one, the built-in `embedded-graphics` monospace
//! fonts are used so the dashboard always has readable labels.

use std::path::{Path, PathBuf};

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Point as EgPoint, Size};
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_7X13_BOLD, FONT_9X15_BOLD};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use embedded_graphics::{Drawable, Pixel};
use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::color::Color;
use crate::error::ClockError;
use crate::geometry::Point;
use crate::raster::Canvas;

/// Environment variable naming a font file.
pub const FONT_ENV: &str = "MISSION_CLOCK_FONT";

/// Fonts tried, in order, when no font is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Convert a size in typographic points to pixels at 96 dpi.
pub fn points(size: f32) -> f32 {
    size * 4.0 / 3.0
}

pub enum TextRenderer {
    TrueType(Font<'static>),
    Mono,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextRenderer::TrueType(_) => f.write_str("TextRenderer::TrueType"),
            TextRenderer::Mono => f.write_str("TextRenderer::Mono"),
        }
    }
}

impl TextRenderer {
    /// Load a font file.
    pub fn from_file(path: &Path) -> Result<Self, ClockError> {
        let data = std::fs::read(path).map_err(|source| ClockError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        Font::try_from_vec(data)
            .map(TextRenderer::TrueType)
            .ok_or_else(|| ClockError::FontParse(path.to_path_buf()))
    }

    /// Pick a renderer: the configured font, then [`FONT_ENV`], then common
    /// system fonts, and finally the built-in monospace fonts.
    pub fn discover(configured: Option<&Path>) -> Self {
        let from_env = std::env::var_os(FONT_ENV).map(PathBuf::from);
        let candidates = configured
            .map(Path::to_path_buf)
            .into_iter()
            .chain(from_env)
            .chain(SYSTEM_FONTS.iter().map(PathBuf::from));

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(renderer) => {
                    tracing::info!("Using font {}", path.display());
                    return renderer;
                }
                Err(e) => tracing::warn!("{e}"),
            }
        }
        tracing::info!("No TrueType font found, using built-in monospace font");
        TextRenderer::Mono
    }

    /// Draw `text` centered on `position`.
    pub fn draw(&self, canvas: &mut Canvas, position: Point, text: &str, font_size: f32, color: Color) {
        if text.is_empty() {
            return;
        }
        match self {
            TextRenderer::TrueType(font) => {
                draw_text(canvas, position, text, font, Scale::uniform(font_size), color);
            }
            TextRenderer::Mono => {
                let character_style = MonoTextStyle::new(mono_font(font_size), Rgb888::new(color.r, color.g, color.b));
                let text_style = TextStyleBuilder::new()
                    .alignment(Alignment::Center)
                    .baseline(Baseline::Middle)
                    .build();
                let anchor = EgPoint::new(position.x.round() as i32, position.y.round() as i32);
                let _ = Text::with_text_style(text, anchor, character_style, text_style).draw(canvas);
            }
        }
    }
}

fn mono_font(font_size: f32) -> &'static MonoFont<'static> {
    if font_size < 12.0 {
        &FONT_6X10
    } else if font_size < 15.0 {
        &FONT_7X13_BOLD
    } else if font_size < 18.0 {
        &FONT_9X15_BOLD
    } else {
        &FONT_10X20
    }
}

fn draw_text(canvas: &mut Canvas, position: Point, text: &str, font: &Font, scale: Scale, color: Color) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font.layout(text, scale, point(0.0, v_metrics.ascent)).collect();

    // Bounding box of the whole string
    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    let width_px = if min_x < max_x { max_x - min_x } else { 0 };
    let height_px = if min_y < max_y { max_y - min_y } else { 0 };
    let offset_x = position.x.round() as i32 - width_px / 2;
    let offset_y = position.y.round() as i32 - height_px / 2;
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                canvas.set_pixel(px, py, color, v);
            });
        }
    }
}

impl DrawTarget for Canvas<'_> {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(at, color) in pixels {
            self.set_pixel(at.x, at.y, Color::new(color.r(), color.g(), color.b()), 1.0);
        }
        Ok(())
    }
}

impl OriginDimensions for Canvas<'_> {
    fn size(&self) -> Size {
        let (width, height) = self.dimensions();
        Size::new(width as u32, height as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_text_lands_around_anchor() {
        let mut frame = vec![0u8; 100 * 40 * 4];
        let mut canvas = Canvas::new(&mut frame, 100, 40);
        TextRenderer::Mono.draw(&mut canvas, Point::new(50.0, 20.0), "12", 16.0, Color::WHITE);
        let mut lit = Vec::new();
        for y in 0..40 {
            for x in 0..100 {
                if canvas.pixel(x, y) == Some(Color::WHITE) {
                    lit.push((x, y));
                }
            }
        }
        assert!(!lit.is_empty());
        assert!(lit.iter().all(|(x, y)| (35..65).contains(x) && (8..32).contains(y)));
    }

    #[test]
    fn empty_text_draws_nothing() {
        let mut frame = vec![0u8; 10 * 10 * 4];
        let mut canvas = Canvas::new(&mut frame, 10, 10);
        TextRenderer::Mono.draw(&mut canvas, Point::new(5.0, 5.0), "", 16.0, Color::WHITE);
        assert!(frame.iter().all(|b| *b == 0));
    }

    #[test]
    fn missing_font_file_is_an_error() {
        let err = TextRenderer::from_file(Path::new("/nonexistent/font.ttf")).unwrap_err();
        assert!(matches!(err, ClockError::FontRead { .. }));
    }

    #[test]
    fn mono_font_sizes() {
        assert_eq!(mono_font(10.0).character_size, FONT_6X10.character_size);
        assert_eq!(mono_font(20.0).character_size, FONT_10X20.character_size);
    }
}
