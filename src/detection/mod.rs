pub mod catalog;
pub mod selector;
pub mod source;

use image::RgbImage;

use crate::error::Result;
use crate::models::{BoundingBox, RawDetection, Selection};

pub use catalog::{ClassCatalog, UNKNOWN_LABEL};
pub use selector::{
    CandidateObserver, DEFAULT_MIN_CONFIDENCE, LogObserver, select_all, select_best,
    select_best_observed,
};
pub use source::{
    DEFAULT_CONFIDENCE_FLOOR, DEFAULT_IMAGE_SIZE, Device, JsonSource, RawDetectionSource,
    SourceConfig, StaticSource,
};

/// Per-frame detector: runs the source, then selects from its output.
pub struct Detector<S> {
    source: S,
    catalog: ClassCatalog,
    pub min_confidence: f32,
    pub verbose: bool,
}

impl<S: RawDetectionSource> Detector<S> {
    pub fn new(source: S, catalog: ClassCatalog) -> Self {
        Self {
            source,
            catalog,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            verbose: false,
        }
    }

    /// Threshold for `detect_all`. `detect` is unaffected.
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Log every candidate `detect` considers.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    /// Best single detection for a frame.
    pub fn detect(&mut self, frame: &RgbImage) -> Result<Selection> {
        let detections = self.source.infer(frame)?;

        if self.verbose {
            Ok(select_best_observed(&detections, &self.catalog, &LogObserver))
        } else {
            Ok(select_best(&detections))
        }
    }

    /// All detections at or above `min_confidence`, in source order.
    pub fn detect_all(&mut self, frame: &RgbImage) -> Result<Vec<RawDetection>> {
        let detections = self.source.infer(frame)?;
        let kept = select_all(&detections, self.min_confidence);

        if self.verbose {
            log::debug!(
                "{}: kept {} of {} detections (min_confidence={})",
                self.source.name(),
                kept.len(),
                detections.len(),
                self.min_confidence
            );
        }

        Ok(kept)
    }

    /// Boxes and `"label conf"` strings ready for the debug renderer.
    pub fn annotate(&self, detections: &[RawDetection]) -> (Vec<BoundingBox>, Vec<String>) {
        annotate(detections, &self.catalog)
    }
}

/// Split detections into boxes and index-aligned labels.
pub fn annotate(
    detections: &[RawDetection],
    catalog: &ClassCatalog,
) -> (Vec<BoundingBox>, Vec<String>) {
    detections
        .iter()
        .map(|d| {
            (
                d.bbox,
                format!("{} {:.2}", catalog.label_for(d.class_id), d.confidence),
            )
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotate_formats_labels() {
        let catalog = ClassCatalog::recycling();
        let (boxes, labels) = annotate(
            &[
                RawDetection::new([0, 0, 10, 10], 3, 0.4),
                RawDetection::new([5, 5, 15, 15], 99, 0.912),
            ],
            &catalog,
        );

        assert_eq!(boxes[1], BoundingBox::new(5, 5, 15, 15));
        assert_eq!(labels, vec!["Can 0.40", "Unknown 0.91"]);
    }
}
