//! Orchestration around the external detection and classification backends.
//!
//! This module owns the domain policy between model inference and the
//! tracker: animal-class gating, per-box crops, dense species probability
//! distributions, threshold filtering and the per-stream session loop.
//! Inference itself stays behind the [`AnimalDetector`] and
//! [`SpeciesClassifier`] traits.

mod builder;
mod detection_pipeline;
mod detector;
mod labels;
mod session;

pub use builder::DetectionBuilder;
pub use detection_pipeline::{ANIMAL_CLASS, ClassifiedAnimal, DetectionPipeline, PipelineConfig};
pub use detector::{AnimalDetector, DetectorOutput, RawDetection, SpeciesClassifier};
pub use labels::{SUPPORTED_LANGUAGES, species_labels};
pub use session::TrackingSession;
