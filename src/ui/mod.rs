//! Presentation layer - record rendering and progress

mod message;
mod progress;

pub use message::render;
pub use progress::ScanSpinner;
