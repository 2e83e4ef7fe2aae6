pub mod detection;
pub mod error;
pub mod models;
pub mod render;

pub use detection::{
    ClassCatalog, Detector, JsonSource, RawDetectionSource, SourceConfig, StaticSource,
    select_all, select_best,
};
pub use error::{Error, Result};
pub use models::{BoundingBox, RawDetection, Selection};
pub use render::{DebugRenderer, FileSink, ImageSink, RenderStyle, persist};

#[cfg(feature = "viewer")]
pub mod gui;

#[cfg(feature = "viewer")]
pub use gui::{ViewerSink, display};
