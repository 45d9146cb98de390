//! Output adapters

pub mod annotated;
pub mod json;

pub use annotated::render;
pub use json::to_json;
