//! Typed error taxonomy for the preview pipeline.
//!
//! Classification itself never fails; every downstream stage fails fast
//! with one of these variants, carrying enough context (side, filename)
//! for the caller to produce a precise user-facing message. The core does
//! not retry — transient failure is not expected in a pure, in-memory
//! pipeline.

use thiserror::Error;

use crate::models::Side;

/// Errors surfaced by the preview pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The uploaded container could not be read as a supported archive.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// A requested side has no renderable content (no copper layer).
    #[error("no renderable content for the {side} side")]
    RenderPrecondition {
        /// The side that had no copper-bearing layer
        side: Side,
    },

    /// No outline/mechanical layer was found among the classified files.
    #[error("no board outline layer found in the archive")]
    MissingOutline,

    /// The outline bounding box is malformed or empty.
    #[error("degenerate board outline geometry (empty or inverted bounding box)")]
    DegenerateGeometry,

    /// The geometry backend failed while rasterizing a specific layer.
    #[error("failed to render layer '{file}': {reason}")]
    LayerRender {
        /// Name of the offending file
        file: String,
        /// Backend failure description
        reason: String,
    },

    /// The geometry backend could not parse a layer's drawing commands.
    #[error("could not parse layer '{file}': {reason}")]
    UnparseableLayer {
        /// Name of the offending file
        file: String,
        /// Parse failure description
        reason: String,
    },
}

/// Convenience alias used throughout the pipeline modules.
pub type Result<T> = std::result::Result<T, PipelineError>;
