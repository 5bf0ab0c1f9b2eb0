use opencv::core::Mat;
use opencv::imgproc;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use crate::capture::domain::frame_source::{FrameSource, FrameStream};
use crate::shared::frame::Frame;

/// Opens cameras through OpenCV's `videoio` backend selection.
pub struct OpenCvCamera;

impl OpenCvCamera {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OpenCvCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for OpenCvCamera {
    fn open(
        &mut self,
        device_index: u32,
    ) -> Result<Box<dyn FrameStream>, Box<dyn std::error::Error>> {
        let capture = VideoCapture::new(device_index as i32, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(format!("Camera {device_index} could not be opened").into());
        }
        log::info!("Opened camera {device_index}");
        Ok(Box::new(OpenCvCameraStream {
            capture: Some(capture),
            bgr: Mat::default(),
            frame_index: 0,
        }))
    }
}

struct OpenCvCameraStream {
    capture: Option<VideoCapture>,
    /// Reused grab buffer.
    bgr: Mat,
    frame_index: usize,
}

impl FrameStream for OpenCvCameraStream {
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let capture = self
            .capture
            .as_mut()
            .ok_or("OpenCvCameraStream: already released")?;

        if !capture.read(&mut self.bgr)? || self.bgr.rows() == 0 || self.bgr.cols() == 0 {
            return Ok(None);
        }

        let mut rgb = Mat::default();
        imgproc::cvt_color_def(&self.bgr, &mut rgb, imgproc::COLOR_BGR2RGB)?;
        let width = rgb.cols() as u32;
        let height = rgb.rows() as u32;
        let data = rgb.data_bytes()?.to_vec();

        let frame = Frame::new(data, width, height, 3, self.frame_index);
        self.frame_index += 1;
        Ok(Some(frame))
    }

    fn release(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            if let Err(e) = capture.release() {
                log::warn!("Failed to release camera: {e}");
            }
        }
    }
}

impl Drop for OpenCvCameraStream {
    fn drop(&mut self) {
        self.release();
    }
}
