//! Physical dimension calculation from outline geometry.

use crate::error::{PipelineError, Result};
use crate::models::{BoundingBox, Dimensions, Unit};

/// Converts a bounding box in `unit` coordinates into physical board
/// dimensions in millimeters / square centimeters.
///
/// # Errors
///
/// Returns [`PipelineError::DegenerateGeometry`] when the box has
/// min > max on either axis (malformed or empty outline) — negative
/// dimensions are never silently produced.
pub fn compute_dimensions(bbox: &BoundingBox, unit: Unit) -> Result<Dimensions> {
    if bbox.is_degenerate() {
        return Err(PipelineError::DegenerateGeometry);
    }

    let factor = unit.to_mm_factor();
    let width_mm = bbox.width() * factor;
    let height_mm = bbox.height() * factor;

    Ok(Dimensions {
        width_mm,
        height_mm,
        area_cm2: width_mm * height_mm / 100.0,
    })
}
