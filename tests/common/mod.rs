#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from deepcycle for tests
pub use deepcycle::{
    BoundingBox, ClassCatalog, DebugRenderer, Detector, FileSink, JsonSource, RawDetection,
    RenderStyle, Selection, SourceConfig, StaticSource, select_all, select_best,
};
