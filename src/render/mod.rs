//! Render orchestration: z-order and style binding over the backend.
//!
//! This module owns no geometry math. It sizes the shared canvas from the
//! outline bounding box, walks the stack in painter's order, binds each
//! role's theme style and delegates rasterization to the collaborator.

pub mod backend;
pub mod canvas;

use tracing::debug;

use crate::constants::{RENDER_MARGIN_MM, RENDER_WIDTH_PX};
use crate::error::{PipelineError, Result};
use crate::models::{BoundingBox, LayerStack, RenderResult, Side};
use crate::render::backend::GeometryBackend;
use crate::render::canvas::Canvas;
use crate::theme::Theme;

/// Renders one side of the board.
///
/// `bbox_mm` is the outline bounding box, already normalized to
/// millimeters; the canvas covers it plus [`RENDER_MARGIN_MM`] at
/// [`RENDER_WIDTH_PX`] pixels wide. Bottom-side renders are mirrored
/// so the board is shown as physically viewed from that face.
///
/// # Errors
///
/// Parse failures propagate as [`PipelineError::UnparseableLayer`];
/// rasterization failures surface as [`PipelineError::LayerRender`]
/// tagged with the offending filename.
pub fn render<B: GeometryBackend + ?Sized>(
    stack: &LayerStack,
    theme: &Theme,
    bbox_mm: BoundingBox,
    backend: &B,
) -> Result<RenderResult> {
    let mut canvas = Canvas::new(
        bbox_mm,
        RENDER_MARGIN_MM,
        RENDER_WIDTH_PX,
        theme.background,
        stack.side == Side::Bottom,
    );

    for layer in &stack.layers {
        debug!(file = %layer.file.name, role = %layer.role, side = %stack.side, "rasterizing layer");
        let geometry = backend.parse(&layer.file)?;
        let style = theme.style(layer.role);
        backend
            .rasterize(&geometry, &style, &mut canvas)
            .map_err(|reason| PipelineError::LayerRender {
                file: layer.file.name.clone(),
                reason,
            })?;
    }

    let image = canvas
        .into_png()
        .map_err(|e| PipelineError::LayerRender {
            file: format!("{} composite", stack.side),
            reason: e.to_string(),
        })?;

    Ok(RenderResult {
        side: stack.side,
        image,
    })
}
