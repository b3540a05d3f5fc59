//! Multi-object tracking core: IoU association, Kalman smoothing and track
//! lifecycle management.

mod kalman_filter;
mod matching;
mod object_tracker;
mod rect;
mod track;

pub use kalman_filter::KalmanFilter;
pub use matching::Detection;
pub use object_tracker::{ObjectTracker, TrackOutput, TrackerConfig};
pub use rect::{Rect, iou_batch};
pub use track::Track;
