use thiserror::Error;

/// Errors raised by detection sources, catalogs and debug rendering.
///
/// Empty frames and unknown class ids are not errors and never show up here.
#[derive(Debug, Error)]
pub enum Error {
    /// The detection source could not produce detections for a frame.
    #[error("detection source '{source_name}' failed: {message}")]
    Source {
        source_name: &'static str,
        message: String,
    },

    #[error("failed to load class catalog: {0}")]
    Catalog(String),

    #[error("failed to load font: {0}")]
    Font(String),

    /// The annotated image could not be written or shown.
    #[error("render failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;
