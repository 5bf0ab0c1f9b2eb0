use std::path::{Path, PathBuf};

use image::GrayImage;
use opencv::core::{Mat, Rect, Scalar, Size, Vector, CV_8UC1};
use opencv::objdetect::{self, CascadeClassifier};
use opencv::prelude::*;

use crate::detection::domain::classifier::{Classifier, ClassifierLoader, DetectParams};
use crate::shared::region::{Region, RegionKind};

/// Loads OpenCV Haar/LBP cascade XML files.
pub struct OpenCvCascadeLoader;

impl OpenCvCascadeLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OpenCvCascadeLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifierLoader for OpenCvCascadeLoader {
    fn load(&self, path: &Path) -> Result<Box<dyn Classifier>, Box<dyn std::error::Error>> {
        // OpenCV silently yields an empty cascade for missing files.
        if !path.is_file() {
            return Err(format!("Cascade file not found: {}", path.display()).into());
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| format!("Cascade path is not valid UTF-8: {}", path.display()))?;
        let inner = CascadeClassifier::new(path_str)?;
        let empty = inner.empty()?;
        log::debug!("Loaded cascade {} (empty: {empty})", path.display());
        Ok(Box::new(OpenCvCascade {
            inner,
            path: path.to_path_buf(),
            empty,
        }))
    }
}

/// A loaded OpenCV cascade classifier.
pub struct OpenCvCascade {
    inner: CascadeClassifier,
    path: PathBuf,
    empty: bool,
}

impl Classifier for OpenCvCascade {
    fn is_empty(&self) -> bool {
        self.empty
    }

    fn source_path(&self) -> &Path {
        &self.path
    }

    fn detect(
        &mut self,
        image: &GrayImage,
        params: &DetectParams,
    ) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        if image.width() == 0 || image.height() == 0 {
            return Ok(Vec::new());
        }

        let mut mat = Mat::new_rows_cols_with_default(
            image.height() as i32,
            image.width() as i32,
            CV_8UC1,
            Scalar::all(0.0),
        )?;
        mat.data_bytes_mut()?.copy_from_slice(image.as_raw());

        let min_size = params
            .min_size
            .map(|(w, h)| Size::new(w as i32, h as i32))
            .unwrap_or_default();

        let mut found: Vector<Rect> = Vector::new();
        self.inner.detect_multi_scale(
            &mat,
            &mut found,
            params.scale_factor,
            params.min_neighbors,
            objdetect::CASCADE_SCALE_IMAGE,
            min_size,
            Size::default(),
        )?;

        Ok(found
            .iter()
            .map(|r| Region::new(r.x, r.y, r.width, r.height, RegionKind::Face))
            .collect())
    }
}
