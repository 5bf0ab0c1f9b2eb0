use std::path::Path;

use image::GrayImage;

use crate::shared::region::Region;

/// Multi-scale detection settings passed through to the cascade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectParams {
    pub scale_factor: f64,
    pub min_neighbors: i32,
    /// Smallest accepted `(width, height)`; `None` lets the cascade decide.
    pub min_size: Option<(u32, u32)>,
}

/// Domain interface for a loaded cascade classifier.
///
/// Returned regions keep the detector's order and are relative to `image`.
/// Their [`RegionKind`](crate::shared::region::RegionKind) is assigned by the
/// caller, which knows what the cascade was loaded for.
pub trait Classifier: Send {
    fn is_empty(&self) -> bool;

    /// File the classifier was loaded from.
    fn source_path(&self) -> &Path;

    fn detect(
        &mut self,
        image: &GrayImage,
        params: &DetectParams,
    ) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}

/// Creates classifiers from cascade definition files.
pub trait ClassifierLoader: Send {
    fn load(&self, path: &Path) -> Result<Box<dyn Classifier>, Box<dyn std::error::Error>>;
}
