//! Data models for board layers, geometry and render output.
//!
//! This module contains all the core data structures used throughout the
//! pipeline. Models are independent of the web surface and business logic.

pub mod geometry;
pub mod layer;

// Re-export all model types
pub use geometry::{BoundingBox, Dimensions, Unit};
pub use layer::{ClassifiedLayer, LayerRole, LayerStack, RawFile, RenderResult, Side};
