use crate::detection::catalog::ClassCatalog;
use crate::models::{RawDetection, Selection};

/// Threshold `select_all` uses unless told otherwise.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.25;

/// Receives every candidate `select_best_observed` looks at.
///
/// Observers only watch; they have no way to change the pick.
pub trait CandidateObserver {
    fn on_candidate(&self, detection: &RawDetection, label: &str);
}

impl<F> CandidateObserver for F
where
    F: Fn(&RawDetection, &str),
{
    fn on_candidate(&self, detection: &RawDetection, label: &str) {
        self(detection, label)
    }
}

/// Logs each candidate at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl CandidateObserver for LogObserver {
    fn on_candidate(&self, detection: &RawDetection, label: &str) {
        log::debug!("{} | conf={:.4}", label, detection.confidence);
    }
}

/// Pick the single highest-confidence detection.
///
/// No floor is applied here; the source's own floor is trusted. A candidate
/// must strictly beat the running best (which starts at 0), so the first of
/// several equal scores wins and a zero-confidence detection is never picked.
pub fn select_best(detections: &[RawDetection]) -> Selection {
    let mut best: Option<&RawDetection> = None;
    let mut best_confidence = 0.0f32;

    for detection in detections {
        if detection.confidence > best_confidence {
            best_confidence = detection.confidence;
            best = Some(detection);
        }
    }

    best.cloned().map(Selection::from).unwrap_or_default()
}

/// `select_best`, reporting every candidate and its label to `observer`.
pub fn select_best_observed(
    detections: &[RawDetection],
    catalog: &ClassCatalog,
    observer: &dyn CandidateObserver,
) -> Selection {
    for detection in detections {
        observer.on_candidate(detection, catalog.label_for(detection.class_id));
    }
    select_best(detections)
}

/// Every detection with `confidence >= min_confidence`, in source order.
///
/// No sorting, deduplication or overlap suppression.
pub fn select_all(detections: &[RawDetection], min_confidence: f32) -> Vec<RawDetection> {
    detections
        .iter()
        .filter(|d| d.confidence >= min_confidence)
        .cloned()
        .collect()
}
