use std::fs;
use std::path::{Path, PathBuf};

use crate::capture::domain::frame_source::{FrameSource, FrameStream};
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;

/// Replays the images of a directory as if they came from a camera.
///
/// Files are visited in lexical order. With `looping` the replay wraps
/// around; otherwise the stream yields `None` once exhausted.
pub struct ImageSequenceSource {
    dir: PathBuf,
    looping: bool,
}

impl ImageSequenceSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            looping: false,
        }
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }
}

impl FrameSource for ImageSequenceSource {
    fn open(
        &mut self,
        device_index: u32,
    ) -> Result<Box<dyn FrameStream>, Box<dyn std::error::Error>> {
        let files = list_images(&self.dir)?;
        if files.is_empty() {
            return Err(format!("No images found in {}", self.dir.display()).into());
        }
        log::debug!(
            "Replaying {} images from {} (device index {device_index} ignored)",
            files.len(),
            self.dir.display()
        );
        Ok(Box::new(ImageSequenceStream {
            files,
            position: 0,
            looping: self.looping,
            released: false,
        }))
    }
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_image(path))
        .collect();
    files.sort();
    Ok(files)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

struct ImageSequenceStream {
    files: Vec<PathBuf>,
    position: usize,
    looping: bool,
    released: bool,
}

impl FrameStream for ImageSequenceStream {
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        if self.released {
            return Err("ImageSequenceStream: already released".into());
        }
        if self.position >= self.files.len() {
            if !self.looping {
                return Ok(None);
            }
            self.position = 0;
        }
        let index = self.position;
        self.position += 1;

        let img = image::open(&self.files[index])?.into_rgb8();
        Ok(Some(Frame::from_rgb_image(img, index)))
    }

    fn release(&mut self) {
        self.released = true;
        self.files.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_image(dir: &Path, name: &str, value: u8) {
        let mut img = image::RgbImage::new(8, 6);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgb([value, value, value]);
        }
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_open_empty_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = ImageSequenceSource::new(dir.path());
        assert!(source.open(0).is_err());
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let mut source = ImageSequenceSource::new("/nonexistent/replay");
        assert!(source.open(0).is_err());
    }

    #[test]
    fn test_reads_images_in_lexical_order_then_ends() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "b.png", 20);
        write_image(dir.path(), "a.png", 10);
        std::fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();

        let mut stream = ImageSequenceSource::new(dir.path()).open(0).unwrap();
        let first = stream.read().unwrap().unwrap();
        let second = stream.read().unwrap().unwrap();
        assert_eq!(first.data()[0], 10);
        assert_eq!(second.data()[0], 20);
        assert_eq!((first.width(), first.height()), (8, 6));
        assert!(stream.read().unwrap().is_none());
    }

    #[test]
    fn test_looping_wraps_around() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "only.png", 42);

        let mut stream = ImageSequenceSource::new(dir.path())
            .looping(true)
            .open(0)
            .unwrap();
        for _ in 0..3 {
            assert_eq!(stream.read().unwrap().unwrap().data()[0], 42);
        }
    }

    #[test]
    fn test_read_after_release_fails_and_release_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "a.png", 1);

        let mut stream = ImageSequenceSource::new(dir.path()).open(0).unwrap();
        stream.release();
        stream.release();
        assert!(stream.read().is_err());
    }
}
