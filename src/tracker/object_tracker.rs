//! Per-video-stream object tracker: association, smoothing and track
//! lifecycle.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tracker::matching::{Detection, associate};
use crate::tracker::rect::Rect;
use crate::tracker::track::Track;

/// Configuration for the [`ObjectTracker`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Process variance of the position filters.
    pub process_var: f32,
    /// Measurement variance of the position filters.
    pub measurement_var: f32,
    /// Process variance of the per-class probability smoothers.
    pub class_process_var: f32,
    /// Measurement variance of the per-class probability smoothers.
    pub class_measurement_var: f32,
    /// Consecutive missed frames a track survives before retirement.
    pub max_missed: u32,
    /// Minimum IoU for a solver-proposed pair to count as the same object.
    pub min_iou: f32,
    /// Tracks whose emitted box comes within this many pixels of a frame
    /// border are presumed to have left the scene and are dropped.
    pub edge_margin: i32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            process_var: 30.0,
            measurement_var: 1.0,
            class_process_var: 0.0,
            class_measurement_var: 0.1,
            max_missed: 5,
            min_iou: 0.1,
            edge_margin: 5,
        }
    }
}

/// One smoothed tracking result for one frame, shaped for downstream
/// persistence and notification consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackOutput {
    /// Stable track identity.
    pub id: u64,
    /// Winning species label for this frame.
    pub label: String,
    /// Smoothed probability of the winning label.
    pub confidence: f32,
    /// Smoothed bounding box, truncated to integer pixel coordinates.
    pub bbox: [i32; 4],
}

/// Tracks objects across the frames of one video stream and smooths their
/// positions and class predictions over time.
///
/// One instance per stream or batch job; state (including the id counter)
/// must never be shared between streams. Frames must be fed to [`update`]
/// exactly once each, in temporal order.
///
/// [`update`]: ObjectTracker::update
#[derive(Debug, Default)]
pub struct ObjectTracker {
    config: TrackerConfig,
    tracks: BTreeMap<u64, Track>,
    next_id: u64,
}

impl ObjectTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            tracks: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Number of live tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Process one frame's detections and return the smoothed tracks.
    ///
    /// Matched tracks are corrected by their detection; unmatched tracks
    /// within the missed-frame tolerance coast on their own prediction and
    /// are still emitted. After emission the live set is rebuilt: a track
    /// survives only if it was emitted this frame, is within tolerance and
    /// its box stayed clear of the frame borders. A retired id is never
    /// reused.
    pub fn update(
        &mut self,
        detections: &[Detection],
        frame_size: (u32, u32),
    ) -> Vec<TrackOutput> {
        let (frame_width, frame_height) = frame_size;

        let track_boxes: Vec<(u64, Rect)> = self
            .tracks
            .iter()
            .map(|(id, track)| (*id, track.predicted_rect()))
            .collect();
        let matches = associate(&track_boxes, detections, &mut self.next_id, self.config.min_iou);

        let mut outputs = Vec::with_capacity(detections.len());
        let mut matched_ids = BTreeSet::new();
        for (det_idx, id) in matches {
            let detection = &detections[det_idx];
            matched_ids.insert(id);
            let track = self.tracks.entry(id).or_insert_with(|| {
                debug!(track_id = id, "starting track");
                Track::new(id, detection, &self.config)
            });
            outputs.push(track.observe(detection, &self.config));
        }

        // Unmatched tracks coast on their own prediction until the missed
        // tolerance runs out; past it they stop being emitted.
        for (id, track) in self.tracks.iter_mut() {
            if !matched_ids.contains(id) {
                track.mark_missed();
                if track.missed() <= self.config.max_missed {
                    outputs.push(track.coast());
                }
            }
        }

        // Rebuild the live set: emitted, within tolerance and not touching
        // a frame border.
        let margin = self.config.edge_margin;
        let width = frame_width as i32;
        let height = frame_height as i32;
        let mut keep = BTreeSet::new();
        for output in &outputs {
            let clear_of_edges = output.bbox[0] > margin
                && output.bbox[1] > margin
                && output.bbox[2] < width - margin
                && output.bbox[3] < height - margin;
            let within_tolerance = self
                .tracks
                .get(&output.id)
                .is_some_and(|track| track.missed() <= self.config.max_missed);
            if clear_of_edges && within_tolerance {
                keep.insert(output.id);
            }
        }
        self.tracks.retain(|id, track| {
            let kept = keep.contains(id);
            if !kept {
                debug!(track_id = *id, missed = track.missed(), "retiring track");
            }
            kept
        });

        outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn detection(x1: f32, y1: f32, x2: f32, y2: f32, label: &str, p: f32) -> Detection {
        let mut class_probs = BTreeMap::new();
        class_probs.insert(label.to_owned(), p);
        Detection::new(Rect::new(x1, y1, x2, y2), class_probs)
    }

    #[test]
    fn test_fresh_tracker_assigns_increasing_ids() {
        let mut tracker = ObjectTracker::default();
        let detections = vec![
            detection(100.0, 100.0, 150.0, 150.0, "fox", 0.8),
            detection(300.0, 300.0, 350.0, 350.0, "badger", 0.7),
            detection(500.0, 100.0, 550.0, 150.0, "lynx", 0.6),
        ];
        let outputs = tracker.update(&detections, (1920, 1080));
        let ids: Vec<u64> = outputs.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn test_empty_frame_is_a_normal_outcome() {
        let mut tracker = ObjectTracker::default();
        assert!(tracker.update(&[], (640, 480)).is_empty());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_output_has_expected_fields() {
        let mut tracker = ObjectTracker::default();
        let outputs = tracker.update(
            &[detection(100.0, 100.0, 102.0, 102.0, "class1", 0.9)],
            (640, 480),
        );
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].id, 0);
        assert_eq!(outputs[0].label, "class1");
        assert!(outputs[0].confidence > 0.0);
    }

    #[test]
    fn test_track_near_border_is_dropped() {
        let mut tracker = ObjectTracker::default();
        // Box starts at x1 = 3, inside the 5 px edge margin.
        tracker.update(&[detection(3.0, 100.0, 53.0, 150.0, "deer", 0.9)], (640, 480));
        assert!(tracker.is_empty());
    }
}
