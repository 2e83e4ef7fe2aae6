mod viewer;

pub use viewer::{ViewerMessage, ViewerSink, display};
