//! Outline layer resolution.
//!
//! Finds the board's mechanical edge among the classified layers and
//! extracts its bounding geometry through the backend. When several
//! outline candidates exist the first in original file order wins — a
//! documented, deterministic choice, not a geometric "best".

use tracing::{debug, warn};

use crate::error::{PipelineError, Result};
use crate::models::{BoundingBox, ClassifiedLayer, LayerRole, Unit};
use crate::render::backend::GeometryBackend;

/// What to do when no outline layer is present. This is a caller-supplied
/// policy, never an implicit default: a missing outline either fails the
/// request or explicitly degrades to the union of the copper layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutlinePolicy {
    /// Fail with `MissingOutlineError` when no outline layer exists
    #[default]
    Require,
    /// Fall back to the union bounding box of all copper layers,
    /// a degraded estimate that ignores board cutouts and routing
    CopperFallback,
}

/// Resolves the board's bounding geometry in its native units.
///
/// # Errors
///
/// Returns [`PipelineError::MissingOutline`] when no outline layer exists
/// and the policy is [`OutlinePolicy::Require`], or when the fallback is
/// active but no copper layer parses either. Parse failures on the chosen
/// layer propagate as [`PipelineError::UnparseableLayer`].
pub fn resolve_outline<B: GeometryBackend + ?Sized>(
    layers: &[ClassifiedLayer],
    backend: &B,
    policy: OutlinePolicy,
) -> Result<(BoundingBox, Unit)> {
    if let Some(outline) = layers.iter().find(|l| l.role == LayerRole::Outline) {
        debug!(file = %outline.file.name, "resolving outline geometry");
        let geometry = backend.parse(&outline.file)?;
        return Ok((backend.bounding_box(&geometry), geometry.units));
    }

    match policy {
        OutlinePolicy::Require => Err(PipelineError::MissingOutline),
        OutlinePolicy::CopperFallback => copper_union(layers, backend),
    }
}

/// Union bounding box of all copper layers, normalized to millimeters so
/// layers with differing native units combine correctly.
fn copper_union<B: GeometryBackend + ?Sized>(
    layers: &[ClassifiedLayer],
    backend: &B,
) -> Result<(BoundingBox, Unit)> {
    warn!("no outline layer found, estimating bounds from copper layers");
    let mut union = BoundingBox::empty();
    let mut found = false;

    for layer in layers.iter().filter(|l| l.role.is_copper()) {
        let geometry = backend.parse(&layer.file)?;
        let bbox = backend.bounding_box(&geometry);
        if bbox.is_degenerate() {
            continue;
        }
        let f = geometry.units.to_mm_factor();
        union = union.union(&BoundingBox::new(
            bbox.min_x * f,
            bbox.min_y * f,
            bbox.max_x * f,
            bbox.max_y * f,
        ));
        found = true;
    }

    if found {
        Ok((union, Unit::Mm))
    } else {
        Err(PipelineError::MissingOutline)
    }
}
