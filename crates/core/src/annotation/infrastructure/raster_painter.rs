use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::Rgb;
use imageproc::drawing::{draw_hollow_circle_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::annotation::domain::frame_painter::{Color, FramePainter};
use crate::annotation::infrastructure::font_resolver;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Pixel height of text drawn at scale 1.0, close to OpenCV's Hershey simplex.
const BASE_TEXT_PX: f32 = 22.0;

/// CPU painter drawing straight into the frame's RGB buffer.
///
/// Shapes use `imageproc`; text needs a TrueType font and is skipped (with a
/// single warning) when none was supplied.
pub struct RasterPainter {
    font: Option<FontVec>,
    warned_missing_font: bool,
}

impl RasterPainter {
    pub fn new(font: Option<FontVec>) -> Self {
        Self {
            font,
            warned_missing_font: false,
        }
    }

    pub fn with_font_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let bytes = std::fs::read(path)?;
        let font = FontVec::try_from_vec(bytes)?;
        log::debug!("Overlay font loaded from {}", path.display());
        Ok(Self::new(Some(font)))
    }

    /// Painter using the font found by [`font_resolver::resolve`].
    ///
    /// Falls back to a text-less painter when no usable font exists.
    pub fn from_font_lookup(explicit: Option<&Path>) -> Self {
        let Some(path) = font_resolver::resolve(explicit) else {
            log::warn!("No overlay font found; labels and face counts will not be drawn");
            return Self::default();
        };
        Self::with_font_file(&path).unwrap_or_else(|e| {
            log::warn!("Could not load font {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }
}

impl Default for RasterPainter {
    fn default() -> Self {
        Self::new(None)
    }
}

fn text_scale(scale: f32) -> PxScale {
    PxScale::from(BASE_TEXT_PX * scale)
}

fn rgb_canvas_error() -> Box<dyn std::error::Error> {
    "RasterPainter: frame is not 3-channel RGB".into()
}

impl FramePainter for RasterPainter {
    fn rectangle(
        &mut self,
        frame: &mut Frame,
        region: &Region,
        color: Color,
        thickness: u32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut canvas = frame.as_rgb_image_mut().ok_or_else(rgb_canvas_error)?;
        for inset in 0..thickness.max(1) as i32 {
            let w = region.width - 2 * inset;
            let h = region.height - 2 * inset;
            if w <= 0 || h <= 0 {
                break;
            }
            let rect = Rect::at(region.x + inset, region.y + inset).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(&mut canvas, rect, Rgb(color));
        }
        Ok(())
    }

    fn circle(
        &mut self,
        frame: &mut Frame,
        center: (i32, i32),
        radius: i32,
        color: Color,
        thickness: u32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut canvas = frame.as_rgb_image_mut().ok_or_else(rgb_canvas_error)?;
        for inset in 0..thickness.max(1) as i32 {
            let r = radius - inset;
            if r < 0 {
                break;
            }
            draw_hollow_circle_mut(&mut canvas, center, r, Rgb(color));
        }
        Ok(())
    }

    fn text(
        &mut self,
        frame: &mut Frame,
        text: &str,
        origin: (i32, i32),
        scale: f32,
        color: Color,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let Some(font) = self.font.as_ref() else {
            if !self.warned_missing_font {
                log::warn!("No overlay font available; text overlays are disabled");
                self.warned_missing_font = true;
            }
            return Ok(());
        };

        let px = text_scale(scale);
        let ascent = font.as_scaled(px).ascent().round() as i32;
        let mut canvas = frame.as_rgb_image_mut().ok_or_else(rgb_canvas_error)?;
        // imageproc positions text by its top edge; `origin` is the baseline.
        draw_text_mut(
            &mut canvas,
            Rgb(color),
            origin.0,
            origin.1 - ascent,
            px,
            font,
            text,
        );
        Ok(())
    }
}
