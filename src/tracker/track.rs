//! Per-object track state: one position filter, one filter per observed
//! species label and a missed-frame counter.

use std::collections::BTreeMap;

use crate::tracker::kalman_filter::KalmanFilter;
use crate::tracker::matching::Detection;
use crate::tracker::object_tracker::{TrackOutput, TrackerConfig};
use crate::tracker::rect::Rect;

/// One physically distinct tracked object across frames.
#[derive(Debug, Clone)]
pub struct Track {
    /// Unique track identifier, monotonically assigned, never reused.
    pub id: u64,
    /// Centroid filter with state `[x, y, vx, vy]`.
    position: KalmanFilter,
    /// One smoother per species label seen on this track, keyed by label so
    /// iteration (and argmax tie-breaking) is deterministic.
    class_filters: BTreeMap<String, KalmanFilter>,
    /// Cached half extents of the last matched box, needed to rebuild a
    /// bounding box from a smoothed centroid.
    half_width: f32,
    half_height: f32,
    /// Consecutive frames without a matching detection.
    missed: u32,
}

impl Track {
    /// Start a track from its first detection.
    pub fn new(id: u64, detection: &Detection, config: &TrackerConfig) -> Self {
        let (cx, cy) = detection.bbox.center();
        let (half_width, half_height) = detection.bbox.half_extents();

        let class_filters = detection
            .class_probs
            .iter()
            .map(|(label, &p)| {
                (
                    label.clone(),
                    KalmanFilter::new(
                        &[p, 0.0],
                        config.class_process_var,
                        config.class_measurement_var,
                    ),
                )
            })
            .collect();

        Self {
            id,
            position: KalmanFilter::new(
                &[cx, cy, 0.0, 0.0],
                config.process_var,
                config.measurement_var,
            ),
            class_filters,
            half_width,
            half_height,
            missed: 0,
        }
    }

    /// Consecutive missed frames so far.
    pub fn missed(&self) -> u32 {
        self.missed
    }

    /// Count one frame without a matching detection.
    pub fn mark_missed(&mut self) {
        self.missed += 1;
    }

    /// Current box estimate rebuilt from the filter centroid and the cached
    /// half extents. Used to build the association cost matrix.
    pub fn predicted_rect(&self) -> Rect {
        let state = self.position.state();
        Rect::from_center(state[0], state[1], self.half_width, self.half_height)
    }

    /// Fold a matched detection into the track and emit the smoothed result.
    ///
    /// Resets the missed counter, refreshes the cached box size and updates
    /// the position filter plus every class filter whose label appears in
    /// the detection (creating filters for labels seen for the first time).
    /// The winning label is the argmax over this frame's smoothed values.
    pub fn observe(&mut self, detection: &Detection, config: &TrackerConfig) -> TrackOutput {
        let (cx, cy) = detection.bbox.center();
        let (half_width, half_height) = detection.bbox.half_extents();
        self.half_width = half_width;
        self.half_height = half_height;
        self.missed = 0;

        let smoothed = self.position.update(&[cx, cy]);

        let mut winner: Option<(String, f32)> = None;
        for (label, &p) in &detection.class_probs {
            let filter = self.class_filters.entry(label.clone()).or_insert_with(|| {
                KalmanFilter::new(
                    &[p, 0.0],
                    config.class_process_var,
                    config.class_measurement_var,
                )
            });
            let value = filter.update(&[p])[0];
            if winner.as_ref().is_none_or(|(_, best)| value > *best) {
                winner = Some((label.clone(), value));
            }
        }

        self.emit(smoothed[0], smoothed[1], winner)
    }

    /// Advance the track one frame without a detection.
    ///
    /// Every filter is refreshed with its own current estimate as the
    /// "measurement", which yields a pure prediction rather than a
    /// correction. The winning label is the argmax over all live filters,
    /// so a label with no recent observation keeps competing with its last
    /// smoothed value.
    pub fn coast(&mut self) -> TrackOutput {
        let current = self.position.measured_state();
        let smoothed = self.position.update(&current);

        let mut winner: Option<(String, f32)> = None;
        for (label, filter) in self.class_filters.iter_mut() {
            let current = filter.measured_state();
            let value = filter.update(&current)[0];
            if winner.as_ref().is_none_or(|(_, best)| value > *best) {
                winner = Some((label.clone(), value));
            }
        }

        self.emit(smoothed[0], smoothed[1], winner)
    }

    fn emit(&self, cx: f32, cy: f32, winner: Option<(String, f32)>) -> TrackOutput {
        let rect = Rect::from_center(cx, cy, self.half_width, self.half_height);
        let (label, confidence) = winner.unwrap_or_default();

        TrackOutput {
            id: self.id,
            label,
            confidence,
            // Truncation toward zero, same as the emitted pixel coordinates
            // downstream consumers compare against frame borders.
            bbox: [
                rect.x1 as i32,
                rect.y1 as i32,
                rect.x2 as i32,
                rect.y2 as i32,
            ],
        }
    }
}
