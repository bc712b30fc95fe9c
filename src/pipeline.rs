//! End-to-end preview pipeline.
//!
//! Data flows one direction: raw files → classifier → stack builder +
//! outline resolver → render orchestrator + dimension calculator →
//! output. Everything is request-scoped; there is no cross-request state.

use std::thread;

use tracing::info;

use crate::classify;
use crate::dimensions::compute_dimensions;
use crate::error::Result;
use crate::models::{BoundingBox, Dimensions, LayerRole, RawFile, Side};
use crate::outline::{resolve_outline, OutlinePolicy};
use crate::render;
use crate::render::backend::GeometryBackend;
use crate::stack::build_stack;
use crate::theme::Theme;

/// Everything the caller needs to build a response.
#[derive(Debug)]
pub struct PipelineOutput {
    /// PNG render of the top face
    pub top_image: Vec<u8>,
    /// PNG render of the bottom face
    pub bottom_image: Vec<u8>,
    /// Physical board dimensions
    pub dimensions: Dimensions,
}

/// Runs the full pipeline over an extracted file set.
///
/// The two side renders are independent pure functions of
/// (stack, theme, bounding box) and run on scoped threads; their results
/// are joined before returning, so concurrent execution is
/// indistinguishable from sequential.
///
/// # Errors
///
/// Surfaces the typed taxonomy of [`crate::error::PipelineError`]:
/// missing outline (subject to `policy`), degenerate geometry, per-side
/// render preconditions, and per-layer parse/render failures.
pub fn process<B: GeometryBackend + ?Sized>(
    files: Vec<RawFile>,
    theme: &Theme,
    policy: OutlinePolicy,
    backend: &B,
) -> Result<PipelineOutput> {
    let layers = classify::classify(files);
    info!(
        total = layers.len(),
        known = layers
            .iter()
            .filter(|l| l.role != LayerRole::Unknown)
            .count(),
        "classified uploaded files"
    );

    let (bbox, unit) = resolve_outline(&layers, backend, policy)?;
    let dimensions = compute_dimensions(&bbox, unit)?;

    let factor = unit.to_mm_factor();
    let bbox_mm = BoundingBox::new(
        bbox.min_x * factor,
        bbox.min_y * factor,
        bbox.max_x * factor,
        bbox.max_y * factor,
    );

    // Stack preconditions are checked before spawning any render work
    let top_stack = build_stack(&layers, Side::Top)?;
    let bottom_stack = build_stack(&layers, Side::Bottom)?;

    let (top, bottom) = thread::scope(|scope| {
        let top_handle =
            scope.spawn(|| render::render(&top_stack, theme, bbox_mm, backend));
        let bottom = render::render(&bottom_stack, theme, bbox_mm, backend);
        let top = top_handle
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (top, bottom)
    });
    let (top, bottom) = (top?, bottom?);

    info!(
        width_mm = dimensions.width_mm,
        height_mm = dimensions.height_mm,
        "preview pipeline complete"
    );

    Ok(PipelineOutput {
        top_image: top.image,
        bottom_image: bottom.image,
        dimensions,
    })
}
