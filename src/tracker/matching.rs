//! Detection input type and detection-to-track association.

use std::collections::BTreeMap;

use ndarray::Array2;

use crate::tracker::rect::{Rect, iou_batch};

/// One frame's detection for one object instance, as produced by the
/// detection pipeline. Not retained beyond a single update cycle.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Bounding box in TLBR pixel coordinates.
    pub bbox: Rect,
    /// Dense per-species probability distribution for this box. The full
    /// distribution is required for per-class smoothing, never just the
    /// top-1 label.
    pub class_probs: BTreeMap<String, f32>,
}

impl Detection {
    pub fn new(bbox: Rect, class_probs: BTreeMap<String, f32>) -> Self {
        Self { bbox, class_probs }
    }
}

/// Fill value for padding rows/columns when squaring the cost matrix.
const PAD_COST: f64 = 1e6;

/// Associate detections with existing tracks.
///
/// Builds a negated-IoU cost matrix between the current track boxes and the
/// detection boxes and solves the linear assignment problem with the
/// Jonker-Volgenant algorithm. A proposed pair is only accepted when its IoU
/// exceeds `min_iou`; rejected pairs and detections left over by the solver
/// are given freshly allocated ids from `next_id`.
///
/// Returns `(detection index, track id)` pairs in processing order: solver
/// results first (track row order), then remaining detections in input
/// order. With no live tracks every detection gets a fresh id.
pub(crate) fn associate(
    tracks: &[(u64, Rect)],
    detections: &[Detection],
    next_id: &mut u64,
    min_iou: f32,
) -> Vec<(usize, u64)> {
    if detections.is_empty() {
        return Vec::new();
    }

    let mut fresh_id = || {
        let id = *next_id;
        *next_id += 1;
        id
    };

    if tracks.is_empty() {
        return (0..detections.len()).map(|j| (j, fresh_id())).collect();
    }

    let track_boxes: Vec<Rect> = tracks.iter().map(|(_, rect)| *rect).collect();
    let det_boxes: Vec<Rect> = detections.iter().map(|det| det.bbox).collect();
    let ious = iou_batch(&track_boxes, &det_boxes);

    // lapjv wants a square matrix; pad with a prohibitive cost so padding
    // rows/columns never outbid a real pairing.
    let size = tracks.len().max(detections.len());
    let mut cost = Array2::<f64>::from_elem((size, size), PAD_COST);
    for i in 0..tracks.len() {
        for j in 0..detections.len() {
            cost[[i, j]] = -(ious[[i, j]] as f64);
        }
    }

    let mut matches = Vec::with_capacity(detections.len());
    let mut covered = vec![false; detections.len()];

    match lapjv::lapjv(&cost) {
        Ok((row_to_col, _)) => {
            for (row, &col) in row_to_col.iter().enumerate().take(tracks.len()) {
                if col >= detections.len() {
                    // Track matched a padding column: unmatched this frame.
                    continue;
                }
                covered[col] = true;
                if ious[[row, col]] > min_iou {
                    matches.push((col, tracks[row].0));
                } else {
                    matches.push((col, fresh_id()));
                }
            }
        }
        Err(_) => {
            // Solver failure leaves every track unmatched; detections fall
            // through to fresh-id allocation below.
        }
    }

    for (j, covered) in covered.into_iter().enumerate() {
        if !covered {
            matches.push((j, fresh_id()));
        }
    }

    matches
}
