use image::{DynamicImage, GrayImage, ImageBuffer, Rgb, RgbImage};

/// A single camera/image frame: contiguous RGB bytes in row-major order.
///
/// Camera backends deliver BGR; conversion happens at the I/O boundary so
/// the session and painters only ever see RGB.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// Wraps an RGB image decoded elsewhere (e.g. by the `image` crate).
    pub fn from_rgb_image(img: RgbImage, index: usize) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height, 3, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// A frame with no pixels, as some cameras return while warming up.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    /// Single-channel intensity copy used as detector input.
    ///
    /// Uses the Rec. 601 luma weights, matching what OpenCV's BGR2GRAY
    /// produces for the same pixels.
    pub fn to_gray(&self) -> GrayImage {
        let channels = self.channels.max(1) as usize;
        let mut gray = Vec::with_capacity((self.width as usize) * (self.height as usize));
        for px in self.data.chunks_exact(channels) {
            let luma = if channels >= 3 {
                (299 * px[0] as u32 + 587 * px[1] as u32 + 114 * px[2] as u32 + 500) / 1000
            } else {
                px[0] as u32
            };
            gray.push(luma as u8);
        }
        GrayImage::from_raw(self.width, self.height, gray).unwrap_or_default()
    }

    /// RGBA copy for display surfaces that need an alpha channel.
    ///
    /// Empty for buffers that are neither RGB nor single-channel.
    pub fn to_rgba(&self) -> Vec<u8> {
        let image = match self.channels {
            1 => GrayImage::from_raw(self.width, self.height, self.data.clone())
                .map(DynamicImage::ImageLuma8),
            _ => self.to_rgb_image().map(DynamicImage::ImageRgb8),
        };
        image
            .map(|i| i.into_rgba8().into_raw())
            .unwrap_or_default()
    }

    /// Borrows the pixel buffer as an RGB image for in-place drawing.
    ///
    /// Returns `None` for non-RGB frames.
    pub fn as_rgb_image_mut(&mut self) -> Option<ImageBuffer<Rgb<u8>, &mut [u8]>> {
        if self.channels != 3 {
            return None;
        }
        ImageBuffer::from_raw(self.width, self.height, self.data.as_mut_slice())
    }

    /// Owned RGB copy, used when encoding snapshots.
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        if self.channels != 3 {
            return None;
        }
        RgbImage::from_raw(self.width, self.height, self.data.clone())
    }
}
