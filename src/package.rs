//! Output package assembly.
//!
//! Combines the two rendered faces and the dimension record into the
//! response ZIP. Fixed entry names only — no user input reaches the
//! archive paths.

use std::io::{Cursor, Write};

use serde_json::json;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{PipelineError, Result};
use crate::models::Dimensions;

/// Entry name of the top-side render.
pub const TOP_IMAGE_NAME: &str = "pcb_top.png";
/// Entry name of the bottom-side render.
pub const BOTTOM_IMAGE_NAME: &str = "pcb_bottom.png";
/// Entry name of the dimension record.
pub const DIMENSIONS_NAME: &str = "dimensions.json";

/// Assembles the response archive.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidArchive`] if the writer fails, which
/// with an in-memory cursor indicates a serialization bug rather than an
/// I/O condition.
pub fn assemble(top_image: &[u8], bottom_image: &[u8], dimensions: &Dimensions) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let manifest = json!({
        "width_mm": dimensions.width_mm,
        "height_mm": dimensions.height_mm,
        "area_cm2": dimensions.area_cm2,
        "generated_at": chrono::Utc::now().to_rfc3339(),
    });
    let manifest_str = serde_json::to_string_pretty(&manifest)
        .map_err(|e| PipelineError::InvalidArchive(format!("failed to serialize manifest: {e}")))?;

    add_entry(&mut zip, TOP_IMAGE_NAME, top_image, options)?;
    add_entry(&mut zip, BOTTOM_IMAGE_NAME, bottom_image, options)?;
    add_entry(&mut zip, DIMENSIONS_NAME, manifest_str.as_bytes(), options)?;

    let cursor = zip
        .finish()
        .map_err(|e| PipelineError::InvalidArchive(format!("failed to finalize package: {e}")))?;
    Ok(cursor.into_inner())
}

fn add_entry(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    content: &[u8],
    options: SimpleFileOptions,
) -> Result<()> {
    zip.start_file(name, options)
        .map_err(|e| PipelineError::InvalidArchive(format!("failed to start entry {name}: {e}")))?;
    zip.write_all(content)
        .map_err(|e| PipelineError::InvalidArchive(format!("failed to write entry {name}: {e}")))?;
    Ok(())
}
