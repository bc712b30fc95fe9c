//! Uploaded archive extraction.
//!
//! Reads a ZIP blob into the flat `RawFile` set the pipeline consumes.
//! Fab houses receive archives in every imaginable shape: files in the
//! root, files inside a single exported folder, macOS resource junk.
//! Extraction flattens directory structure by keeping base filenames and
//! drops entries that can never be layers.

use std::io::{Cursor, Read};

use tracing::debug;
use zip::ZipArchive;

use crate::error::{PipelineError, Result};
use crate::models::RawFile;

/// Extracts every usable file from a ZIP archive blob.
///
/// Directory entries, `__MACOSX` resource forks, dotfiles and `.ipc`
/// netlist exports are skipped. Nested paths are flattened to their base
/// filename, which handles the common single-subdirectory export layout.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidArchive`] when the blob is not a
/// readable ZIP, or names a RAR (unsupported container).
pub fn extract(blob: &[u8], filename: &str) -> Result<Vec<RawFile>> {
    if filename.to_lowercase().ends_with(".rar") {
        return Err(PipelineError::InvalidArchive(
            "RAR archives are not supported, please upload a ZIP".to_string(),
        ));
    }

    let mut archive = ZipArchive::new(Cursor::new(blob))
        .map_err(|e| PipelineError::InvalidArchive(format!("not a valid ZIP archive: {e}")))?;

    let mut files = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| PipelineError::InvalidArchive(format!("corrupt ZIP entry: {e}")))?;
        if entry.is_dir() {
            continue;
        }

        let full_name = entry.name().to_string();
        if full_name.contains("__MACOSX") {
            continue;
        }
        // rsplit yields at least one piece, so the fallback never fires
        let base_name = full_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or("")
            .to_string();
        if base_name.is_empty() || base_name.starts_with('.') {
            continue;
        }
        if base_name.to_lowercase().ends_with(".ipc") {
            debug!(file = %base_name, "skipping netlist file");
            continue;
        }

        let mut bytes = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| PipelineError::InvalidArchive(format!("failed to read '{base_name}': {e}")))?;
        files.push(RawFile::new(base_name, bytes));
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn make_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extracts_root_files() {
        let blob = make_zip(&[("board.gtl", b"a"), ("board.gko", b"b")]);
        let files = extract(&blob, "upload.zip").unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "board.gtl");
        assert_eq!(files[0].bytes, b"a");
    }

    #[test]
    fn test_flattens_single_subdirectory() {
        let blob = make_zip(&[("gerbers/board.gtl", b"a"), ("gerbers/board.gbl", b"b")]);
        let files = extract(&blob, "upload.zip").unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["board.gtl", "board.gbl"]);
    }

    #[test]
    fn test_flattens_backslash_paths() {
        let blob = make_zip(&[("gerbers\\board.gtl", b"a")]);
        let files = extract(&blob, "upload.zip").unwrap();
        assert_eq!(files[0].name, "board.gtl");
    }

    #[test]
    fn test_skips_macos_junk_and_dotfiles() {
        let blob = make_zip(&[
            ("__MACOSX/._board.gtl", b"junk"),
            (".DS_Store", b"junk"),
            ("board.gtl", b"a"),
        ]);
        let files = extract(&blob, "upload.zip").unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "board.gtl");
    }

    #[test]
    fn test_skips_ipc_netlists() {
        let blob = make_zip(&[("board.ipc", b"n"), ("board.gtl", b"a")]);
        let files = extract(&blob, "upload.zip").unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_corrupt_blob_is_invalid_archive() {
        let err = extract(b"definitely not a zip", "upload.zip").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidArchive(_)));
    }

    #[test]
    fn test_rar_is_rejected() {
        let err = extract(b"Rar!", "upload.rar").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidArchive(ref msg) if msg.contains("RAR")));
    }
}
