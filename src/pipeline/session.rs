//! Per-video-stream session bundling detection, classification and tracking.

use image::RgbImage;
use tracing::debug;

use crate::error::Result;
use crate::pipeline::detection_pipeline::DetectionPipeline;
use crate::pipeline::detector::{AnimalDetector, SpeciesClassifier};
use crate::tracker::{Detection, ObjectTracker, TrackOutput, TrackerConfig};

/// Drives the full per-frame cycle for one video stream: detect, gate to
/// animals, classify crops, then feed the tracker.
///
/// One session per video or camera stream; the tracker state inside never
/// leaks across sessions. Frames must be processed sequentially, each
/// exactly once.
pub struct TrackingSession<D, C> {
    pipeline: DetectionPipeline<D, C>,
    tracker: ObjectTracker,
}

impl<D: AnimalDetector, C: SpeciesClassifier> TrackingSession<D, C> {
    /// Create a session around an already-validated pipeline.
    pub fn new(pipeline: DetectionPipeline<D, C>, tracker_config: TrackerConfig) -> Self {
        Self {
            pipeline,
            tracker: ObjectTracker::new(tracker_config),
        }
    }

    /// Create a session with the default tracker configuration.
    pub fn with_default_tracker(pipeline: DetectionPipeline<D, C>) -> Self {
        Self::new(pipeline, TrackerConfig::default())
    }

    /// Process a single frame and return the smoothed tracks.
    ///
    /// Thresholds come from the pipeline configuration. A frame with no
    /// animals yields an empty list, which is a normal outcome.
    pub fn process_frame(&mut self, frame: &RgbImage) -> Result<Vec<TrackOutput>> {
        let detection_threshold = self.pipeline.config().detection_threshold;
        let classification_threshold = self.pipeline.config().classification_threshold;

        let results = self.pipeline.run_detection(frame, detection_threshold)?;
        let animals = self
            .pipeline
            .classify(frame, &results, classification_threshold)?;
        debug!(animals = animals.len(), "classified frame");

        let detections: Vec<Detection> = animals.iter().map(Detection::from).collect();
        Ok(self.tracker.update(&detections, frame.dimensions()))
    }

    /// Get a reference to the underlying pipeline.
    pub fn pipeline(&self) -> &DetectionPipeline<D, C> {
        &self.pipeline
    }

    /// Get a mutable reference to the underlying pipeline.
    pub fn pipeline_mut(&mut self) -> &mut DetectionPipeline<D, C> {
        &mut self.pipeline
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &ObjectTracker {
        &self.tracker
    }

    /// Get a mutable reference to the underlying tracker.
    pub fn tracker_mut(&mut self) -> &mut ObjectTracker {
        &mut self.tracker
    }
}
