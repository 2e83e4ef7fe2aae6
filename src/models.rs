use serde::{Deserialize, Serialize};

/// Axis-aligned box in frame pixels.
///
/// Coordinates are inclusive, so a box whose corners coincide covers one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BoundingBox {
    /// Build a box from two corners in any order.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            left: x1.min(x2),
            top: y1.min(y2),
            right: x1.max(x2),
            bottom: y1.max(y2),
        }
    }

    /// Inclusive width, saturating at `u32::MAX` for boxes spanning every `i32`.
    pub fn width(&self) -> u32 {
        self.right.abs_diff(self.left).saturating_add(1)
    }

    /// Inclusive height, saturating like `width`.
    pub fn height(&self) -> u32 {
        self.bottom.abs_diff(self.top).saturating_add(1)
    }
}

impl From<[i32; 4]> for BoundingBox {
    fn from(xyxy: [i32; 4]) -> Self {
        Self::new(xyxy[0], xyxy[1], xyxy[2], xyxy[3])
    }
}

impl From<BoundingBox> for [i32; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.left, bbox.top, bbox.right, bbox.bottom]
    }
}

/// One detector output for a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub bbox: BoundingBox,
    /// Usually a catalog key, but any id is accepted.
    pub class_id: i64,
    pub confidence: f32,
}

impl RawDetection {
    pub fn new(bbox: impl Into<BoundingBox>, class_id: i64, confidence: f32) -> Self {
        Self {
            bbox: bbox.into(),
            class_id,
            confidence,
        }
    }
}

/// Result of best-pick selection: at most one detection per frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    best: Option<RawDetection>,
}

impl Selection {
    /// The "no detection" result.
    pub fn none() -> Self {
        Self { best: None }
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_none()
    }

    pub fn detection(&self) -> Option<&RawDetection> {
        self.best.as_ref()
    }

    pub fn into_detection(self) -> Option<RawDetection> {
        self.best
    }

    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.best.as_ref().map(|d| &d.bbox)
    }

    pub fn class_id(&self) -> Option<i64> {
        self.best.as_ref().map(|d| d.class_id)
    }

    /// Confidence of the pick, or 0 when nothing was selected.
    pub fn confidence(&self) -> f32 {
        self.best.as_ref().map_or(0.0, |d| d.confidence)
    }
}

impl From<RawDetection> for Selection {
    fn from(detection: RawDetection) -> Self {
        Self {
            best: Some(detection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_normalizes_corners() {
        let bbox = BoundingBox::new(15, 20, 5, 2);
        assert_eq!(bbox, BoundingBox { left: 5, top: 2, right: 15, bottom: 20 });
        assert_eq!(bbox.width(), 11);
        assert_eq!(bbox.height(), 19);
    }

    #[test]
    fn degenerate_box_covers_one_pixel() {
        let bbox = BoundingBox::new(3, 3, 3, 3);
        assert_eq!((bbox.width(), bbox.height()), (1, 1));
    }

    #[test]
    fn full_range_box_saturates() {
        let bbox = BoundingBox::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(bbox.width(), u32::MAX);
        assert_eq!(bbox.height(), u32::MAX);
    }

    #[test]
    fn detection_json_uses_corner_array() {
        let det: RawDetection =
            serde_json::from_str(r#"{"bbox": [5, 5, 15, 15], "class_id": 5, "confidence": 0.91}"#)
                .unwrap();
        assert_eq!(det.bbox, BoundingBox::new(5, 5, 15, 15));
        assert_eq!(det.class_id, 5);

        let json = serde_json::to_value(&det).unwrap();
        assert_eq!(json["bbox"], serde_json::json!([5, 5, 15, 15]));
    }

    #[test]
    fn empty_selection_reports_zero_confidence() {
        let selection = Selection::none();
        assert!(selection.is_empty());
        assert_eq!(selection.confidence(), 0.0);
        assert_eq!(selection.class_id(), None);
        assert!(selection.bbox().is_none());
    }
}
