//! Detection/classification orchestration around the external backends.

use std::collections::BTreeMap;

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::pipeline::detector::{AnimalDetector, DetectorOutput, SpeciesClassifier};
use crate::pipeline::labels::species_labels;
use crate::tracker::{Detection, Rect};

/// Class name the detector must reserve for animals; every other detected
/// class (person, vehicle, ...) is discarded before classification.
pub const ANIMAL_CLASS: &str = "animal";

const SUPPORTED_DEVICES: &[&str] = &["auto", "cpu", "gpu", "npu"];

/// Configuration for a [`DetectionPipeline`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Language of the species labels ("en", "fr", "it" or "de").
    pub language: String,
    /// Inference device hint forwarded to the backends.
    pub device: String,
    /// Score threshold the detection backend applies.
    pub detection_threshold: f32,
    /// Inclusive lower bound on the winning species score; crops below it
    /// are dropped silently.
    pub classification_threshold: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            language: "en".to_owned(),
            device: "auto".to_owned(),
            detection_threshold: 0.5,
            classification_threshold: 0.5,
        }
    }
}

/// One animal retained by the classification stage.
///
/// Carries the full per-species distribution, not just the winner: the
/// tracker's per-class smoothing needs every label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedAnimal {
    /// Detection box in the original frame.
    pub bbox: Rect,
    /// Highest-scoring species label.
    pub label: String,
    /// Score of the winning label.
    pub confidence: f32,
    /// Dense label-to-score mapping over the whole species table.
    pub class_probs: BTreeMap<String, f32>,
}

impl ClassifiedAnimal {
    /// Shape this result as a tracker input.
    pub fn to_detection(&self) -> Detection {
        Detection::new(self.bbox, self.class_probs.clone())
    }
}

impl From<&ClassifiedAnimal> for Detection {
    fn from(animal: &ClassifiedAnimal) -> Self {
        animal.to_detection()
    }
}

/// Orchestrates the external detector and classifier with domain policy:
/// animal-class gating, per-box crops, dense species distributions and
/// threshold filtering.
pub struct DetectionPipeline<D, C> {
    detector: D,
    classifier: C,
    config: PipelineConfig,
    animal_class_id: usize,
    labels: &'static [&'static str],
}

impl<D: AnimalDetector, C: SpeciesClassifier> DetectionPipeline<D, C> {
    /// Build a pipeline, rejecting unsupported configuration up front.
    ///
    /// Fails if the language has no label table, the device is unknown or
    /// the detector's class list has no [`ANIMAL_CLASS`] entry.
    pub fn new(detector: D, classifier: C, config: PipelineConfig) -> Result<Self> {
        let labels = species_labels(&config.language)
            .ok_or_else(|| Error::UnsupportedLanguage(config.language.clone()))?;

        let device = config.device.to_ascii_lowercase();
        if !SUPPORTED_DEVICES.contains(&device.as_str()) {
            return Err(Error::UnsupportedDevice(config.device.clone()));
        }

        let animal_class_id = detector
            .class_names()
            .iter()
            .position(|name| name == ANIMAL_CLASS)
            .ok_or(Error::MissingAnimalClass(ANIMAL_CLASS))?;

        info!(
            device = %config.device,
            language = %config.language,
            "initializing detection pipeline"
        );

        Ok(Self {
            detector,
            classifier,
            config,
            animal_class_id,
            labels,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The species label table for the configured language.
    pub fn labels(&self) -> &'static [&'static str] {
        self.labels
    }

    /// Switch the classification label language mid-session.
    pub fn set_language(&mut self, language: &str) -> Result<()> {
        self.labels =
            species_labels(language).ok_or_else(|| Error::UnsupportedLanguage(language.to_owned()))?;
        self.config.language = language.to_owned();
        Ok(())
    }

    /// Run the detection backend and keep only animal-class boxes.
    ///
    /// The backend applies `detection_threshold` itself; no extra score
    /// filtering happens here. Zero retained boxes is a normal outcome.
    pub fn run_detection(
        &mut self,
        image: &RgbImage,
        detection_threshold: f32,
    ) -> Result<DetectorOutput> {
        let raw = self.detector.detect(image, detection_threshold)?;
        let total = raw.len();

        let mut filtered = DetectorOutput::default();
        for (detection, label) in raw.detections.into_iter().zip(raw.labels) {
            if detection.class_id == self.animal_class_id {
                filtered.detections.push(detection);
                filtered.labels.push(label);
            }
        }

        debug!(kept = filtered.len(), total, "animal-class gating");
        Ok(filtered)
    }

    /// Classify each retained detection box independently.
    ///
    /// Crops the frame to each box, runs the classifier once per crop and
    /// keeps the crop iff the winning score reaches
    /// `classification_threshold` (inclusive). Each kept result carries the
    /// dense distribution over the whole species table.
    pub fn classify(
        &mut self,
        image: &RgbImage,
        results: &DetectorOutput,
        classification_threshold: f32,
    ) -> Result<Vec<ClassifiedAnimal>> {
        let mut classified = Vec::new();

        for raw in &results.detections {
            let Some(crop) = crop_to_box(image, &raw.bbox) else {
                debug!(bbox = ?raw.bbox, "skipping degenerate crop");
                continue;
            };

            let scores = self.classifier.classify(&crop)?;
            if scores.len() != self.labels.len() {
                return Err(Error::ClassCountMismatch {
                    got: scores.len(),
                    expected: self.labels.len(),
                });
            }

            let (winner, best) = scores
                .iter()
                .enumerate()
                .fold((0, f32::MIN), |(wi, ws), (i, &s)| {
                    if s > ws { (i, s) } else { (wi, ws) }
                });

            if best < classification_threshold {
                debug!(
                    score = best,
                    threshold = classification_threshold,
                    "dropping crop below classification threshold"
                );
                continue;
            }

            let class_probs = self
                .labels
                .iter()
                .zip(&scores)
                .map(|(label, &score)| ((*label).to_owned(), score))
                .collect();

            classified.push(ClassifiedAnimal {
                bbox: raw.bbox,
                label: self.labels[winner].to_owned(),
                confidence: best,
                class_probs,
            });
        }

        Ok(classified)
    }
}

/// Crop a frame to a detection box, clamped to the image bounds.
/// Returns `None` when the clamped box has no area.
fn crop_to_box(image: &RgbImage, bbox: &Rect) -> Option<RgbImage> {
    let (img_width, img_height) = image.dimensions();
    let x1 = (bbox.x1.max(0.0) as u32).min(img_width);
    let y1 = (bbox.y1.max(0.0) as u32).min(img_height);
    let x2 = (bbox.x2.max(0.0) as u32).min(img_width);
    let y2 = (bbox.y2.max(0.0) as u32).min(img_height);

    if x2 <= x1 || y2 <= y1 {
        return None;
    }

    Some(image::imageops::crop_imm(image, x1, y1, x2 - x1, y2 - y1).to_image())
}
