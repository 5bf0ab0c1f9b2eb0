use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// RGB colour.
pub type Color = [u8; 3];

pub const FACE_COLOR: Color = [0, 255, 0];
pub const EYE_COLOR: Color = [0, 0, 255];
pub const OUTLINE_THICKNESS: u32 = 2;

/// Domain interface for drawing overlays onto a frame in place.
pub trait FramePainter: Send {
    /// Hollow rectangle along the region's border.
    fn rectangle(
        &mut self,
        frame: &mut Frame,
        region: &Region,
        color: Color,
        thickness: u32,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Hollow circle.
    fn circle(
        &mut self,
        frame: &mut Frame,
        center: (i32, i32),
        radius: i32,
        color: Color,
        thickness: u32,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Text with its baseline-left corner at `origin`.
    fn text(
        &mut self,
        frame: &mut Frame,
        text: &str,
        origin: (i32, i32),
        scale: f32,
        color: Color,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
