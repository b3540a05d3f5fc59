//! Multi-object tracking and temporal smoothing for wildlife camera detections.
//!
//! The crate has two halves:
//!
//! - [`tracker`] — the tracking core: per-frame association of detections to
//!   persistent track identities (Hungarian assignment over an IoU cost
//!   matrix) and Kalman smoothing of both box positions and per-species
//!   probabilities.
//! - [`pipeline`] — orchestration around external detection/classification
//!   backends: animal-class gating, crop-based species classification and a
//!   per-video-stream session bundling a pipeline with a tracker.
//!
//! Model inference, video I/O, persistence and notification delivery are not
//! part of this crate; they plug in at the [`pipeline::AnimalDetector`] and
//! [`pipeline::SpeciesClassifier`] seams or consume the serializable
//! [`tracker::TrackOutput`] records.

pub mod error;
pub mod pipeline;
pub mod tracker;

pub use error::{Error, Result};
pub use pipeline::{
    AnimalDetector, ClassifiedAnimal, DetectionBuilder, DetectionPipeline, DetectorOutput,
    PipelineConfig, RawDetection, SpeciesClassifier, TrackingSession,
};
pub use tracker::{Detection, KalmanFilter, ObjectTracker, Rect, TrackOutput, TrackerConfig};
