//! Trait seams for the external detection and classification backends.

use image::RgbImage;

use crate::error::Result;
use crate::tracker::Rect;

/// One raw box from the detection backend, before animal-class gating.
#[derive(Debug, Clone)]
pub struct RawDetection {
    /// Bounding box in TLBR pixel coordinates.
    pub bbox: Rect,
    /// Index into the detector's own class list (person/animal/vehicle...).
    pub class_id: usize,
    /// Detection confidence score.
    pub confidence: f32,
}

/// Everything the detection backend reports for one frame.
#[derive(Debug, Clone, Default)]
pub struct DetectorOutput {
    pub detections: Vec<RawDetection>,
    /// Human-readable label per detection, parallel to `detections`.
    pub labels: Vec<String>,
}

impl DetectorOutput {
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

/// Object detection backend.
///
/// The backend applies the detection threshold itself; the pipeline only
/// gates the returned boxes on the animal class. The class list must label
/// the reserved `"animal"` class consistently across calls.
pub trait AnimalDetector {
    /// The detector's class list (e.g. `["animal", "person", "vehicle"]`).
    fn class_names(&self) -> &[String];

    /// Run inference on a frame and return thresholded detections.
    fn detect(&mut self, image: &RgbImage, threshold: f32) -> Result<DetectorOutput>;
}

/// Species classification backend.
///
/// Scores are comparable within one call but need not sum to 1. The vector
/// must line up with the species label table of the pipeline's configured
/// language.
pub trait SpeciesClassifier {
    /// Classify one crop and return a score per species-class index.
    fn classify(&mut self, crop: &RgbImage) -> Result<Vec<f32>>;
}
