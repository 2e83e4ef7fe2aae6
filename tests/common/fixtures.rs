use deepcycle::RawDetection;
use image::{ImageBuffer, Rgb, RgbImage};
use tempfile::NamedTempFile;

/// 64x48 frame with a horizontal gradient so copies can be told apart.
pub fn test_frame() -> RgbImage {
    ImageBuffer::from_fn(64, 48, |x, y| Rgb([(x * 4) as u8, (y * 5) as u8, 128u8]))
}

/// Detection with a fixed box, for tests that only care about scores.
pub fn det(class_id: i64, confidence: f32) -> RawDetection {
    RawDetection::new([0, 0, 10, 10], class_id, confidence)
}

/// The two-detection frame from the selection scenarios.
pub fn scenario_a() -> Vec<RawDetection> {
    vec![
        RawDetection::new([0, 0, 10, 10], 3, 0.40),
        RawDetection::new([5, 5, 15, 15], 5, 0.91),
    ]
}

/// Writes `detections` as a JSON export and returns the temp file.
/// The file will be automatically cleaned up when dropped.
pub fn write_export(detections: &[RawDetection]) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("Failed to create temp export file");
    serde_json::to_writer(file.as_file(), detections).expect("Failed to write export");
    file
}

/// Deterministic pseudo-random detection lists for property checks.
pub fn generated_lists() -> Vec<Vec<RawDetection>> {
    let mut state = 0x2545_f491_u32;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };

    (0..50)
        .map(|len| {
            (0..len % 12)
                .map(|i| {
                    // Coarse steps so ties show up regularly.
                    let confidence = (next() % 21) as f32 / 20.0;
                    RawDetection::new([i, i, i + 5, i + 5], (next() % 14) as i64 - 1, confidence)
                })
                .collect()
        })
        .collect()
}
