use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in image pixel coordinates.
///
/// Stored in TLBR format (`x1, y1, x2, y2`) with `x1 < x2` and `y1 < y2`,
/// matching what detection backends emit. Immutable value type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left x coordinate
    pub x1: f32,
    /// Top-left y coordinate
    pub y1: f32,
    /// Bottom-right x coordinate
    pub x2: f32,
    /// Bottom-right y coordinate
    pub y2: f32,
}

impl Rect {
    /// Create a new Rect from TLBR corner coordinates.
    #[inline]
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a Rect from TLWH format (top-left x, top-left y, width, height).
    #[inline]
    pub fn from_tlwh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    /// Create a Rect from a centroid and half extents.
    #[inline]
    pub fn from_center(cx: f32, cy: f32, half_width: f32, half_height: f32) -> Self {
        Self {
            x1: cx - half_width,
            y1: cy - half_height,
            x2: cx + half_width,
            y2: cy + half_height,
        }
    }

    /// Corner coordinates as `[x1, y1, x2, y2]`.
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Width of the bounding box.
    #[inline]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    /// Height of the bounding box.
    #[inline]
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Centroid of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Half extents `(half_width, half_height)`, used to rebuild a box from
    /// a smoothed centroid.
    #[inline]
    pub fn half_extents(&self) -> (f32, f32) {
        (self.width() / 2.0, self.height() / 2.0)
    }

    /// Area of the bounding box.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Intersection over Union with another bounding box, in `[0, 1]`.
    ///
    /// Non-overlapping boxes score 0; a zero-area union also scores 0
    /// rather than dividing by zero.
    pub fn iou(&self, other: &Rect) -> f32 {
        let xi1 = self.x1.max(other.x1);
        let yi1 = self.y1.max(other.y1);
        let xi2 = self.x2.min(other.x2);
        let yi2 = self.y2.min(other.y2);

        let inter_area = (xi2 - xi1).max(0.0) * (yi2 - yi1).max(0.0);
        let union_area = self.area() + other.area() - inter_area;

        if union_area > 0.0 {
            inter_area / union_area
        } else {
            0.0
        }
    }
}

use ndarray::Array2;

/// Calculate the IoU matrix between two sets of bounding boxes.
///
/// Returns a matrix of shape (M, N) where M is the length of `boxes_a`
/// and N is the length of `boxes_b`.
pub fn iou_batch(boxes_a: &[Rect], boxes_b: &[Rect]) -> Array2<f32> {
    let mut ious = Array2::zeros((boxes_a.len(), boxes_b.len()));
    for (i, a) in boxes_a.iter().enumerate() {
        for (j, b) in boxes_b.iter().enumerate() {
            ious[[i, j]] = a.iou(b);
        }
    }
    ious
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_geometry() {
        let rect = Rect::new(10.0, 20.0, 40.0, 60.0);
        assert_eq!(rect.width(), 30.0);
        assert_eq!(rect.height(), 40.0);
        assert_eq!(rect.center(), (25.0, 40.0));
        assert_eq!(rect.half_extents(), (15.0, 20.0));
        assert_eq!(rect.area(), 1200.0);
    }

    #[test]
    fn test_from_tlwh() {
        let rect = Rect::from_tlwh(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.to_tlbr(), [10.0, 20.0, 40.0, 60.0]);
    }

    #[test]
    fn test_from_center_roundtrip() {
        let rect = Rect::new(10.0, 20.0, 40.0, 60.0);
        let (cx, cy) = rect.center();
        let (hw, hh) = rect.half_extents();
        assert_eq!(Rect::from_center(cx, cy, hw, hh), rect);
    }

    #[test]
    fn test_iou_partial_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 15.0, 15.0);

        // Intersection: 5x5 = 25
        // Union: 100 + 100 - 25 = 175
        let iou = a.iou(&b);
        assert!((iou - 25.0 / 175.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_symmetric_and_bounded() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(1.0, 1.0, 3.0, 3.0);
        assert_eq!(a.iou(&b), b.iou(&a));
        assert!(a.iou(&b) >= 0.0 && a.iou(&b) <= 1.0);
    }

    #[test]
    fn test_iou_no_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_same_box() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!((a.iou(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_zero_area_union() {
        let a = Rect::new(5.0, 5.0, 5.0, 5.0);
        assert_eq!(a.iou(&a), 0.0);
    }

    #[test]
    fn test_iou_batch_shape() {
        let a = vec![Rect::new(0.0, 0.0, 2.0, 2.0); 3];
        let b = vec![Rect::new(0.0, 0.0, 2.0, 2.0); 2];
        let ious = iou_batch(&a, &b);
        assert_eq!(ious.dim(), (3, 2));
        assert!((ious[[2, 1]] - 1.0).abs() < 1e-6);
    }
}
