//! Render stack selection and z-ordering.
//!
//! A stack is the subset of classified layers visible from one face, in
//! painter's-algorithm order: soldermask first, then copper, silkscreen,
//! drill hits, and the board outline drawn last as an edge overlay.

use crate::error::{PipelineError, Result};
use crate::models::{ClassifiedLayer, LayerRole, LayerStack, Side};

/// Fixed total z-order over roles, bottom-most first. Roles absent from a
/// request are simply omitted; `Unknown` never enters a stack.
const fn z_index(role: LayerRole) -> u8 {
    match role {
        LayerRole::TopSoldermask | LayerRole::BottomSoldermask => 0,
        LayerRole::TopCopper | LayerRole::BottomCopper => 1,
        LayerRole::TopSilkscreen | LayerRole::BottomSilkscreen => 2,
        LayerRole::Drill => 3,
        LayerRole::Outline => 4,
        LayerRole::Unknown => u8::MAX,
    }
}

/// Builds the render stack for one side.
///
/// Side-agnostic roles (outline, drill) are visible from both faces and
/// are included in both stacks. The output order depends only on the set
/// of present roles, not on input file order: layers sort by the fixed
/// z-order, with same-role ties broken by filename.
///
/// # Errors
///
/// Returns [`PipelineError::RenderPrecondition`] when the requested side
/// has no copper-bearing layer — a blank image would be produced
/// otherwise, which is never what the uploader wants.
pub fn build_stack(layers: &[ClassifiedLayer], side: Side) -> Result<LayerStack> {
    let mut selected: Vec<ClassifiedLayer> = layers
        .iter()
        .filter(|layer| layer.role != LayerRole::Unknown)
        .filter(|layer| layer.side() == side || layer.side() == Side::None)
        .cloned()
        .collect();

    if !selected.iter().any(|layer| layer.role.is_copper()) {
        return Err(PipelineError::RenderPrecondition { side });
    }

    selected.sort_by(|a, b| {
        z_index(a.role)
            .cmp(&z_index(b.role))
            .then_with(|| a.file.name.cmp(&b.file.name))
    });

    Ok(LayerStack {
        side,
        layers: selected,
    })
}
