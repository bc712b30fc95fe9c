//! Shared synthetic fabrication-file fixtures for integration tests.
#![allow(dead_code)] // Not every suite uses every fixture

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Gerber outline tracing a 100 x 50 mm rectangle with a zero-width
/// aperture, so the bounding box is exactly (0,0)-(100,50).
#[must_use]
pub fn outline_gerber() -> String {
    "%FSLAX24Y24*%\n\
     %MOMM*%\n\
     %ADD10C,0.000*%\n\
     D10*\n\
     X0Y0D02*\n\
     X1000000Y0D01*\n\
     X1000000Y500000D01*\n\
     X0Y500000D01*\n\
     X0Y0D01*\n\
     M02*\n"
        .to_string()
}

/// Copper layer with one diagonal trace and one flashed pad, well inside
/// the outline.
#[must_use]
pub fn copper_gerber() -> String {
    "%FSLAX24Y24*%\n\
     %MOMM*%\n\
     %ADD10C,0.500*%\n\
     %ADD11R,2.000X1.000*%\n\
     D10*\n\
     X100000Y100000D02*\n\
     X900000Y400000D01*\n\
     D11*\n\
     X500000Y250000D03*\n\
     M02*\n"
        .to_string()
}

/// Excellon drill file with two hits.
#[must_use]
pub fn drill_excellon() -> String {
    "M48\nMETRIC\nT1C0.800\n%\nT1\nX25.0Y25.0\nX75.0Y25.0\nM30\n".to_string()
}

/// Builds an in-memory ZIP from (name, content) pairs.
#[must_use]
pub fn make_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// A complete, well-formed upload: top/bottom copper, outline, drill.
#[must_use]
pub fn full_board_zip() -> Vec<u8> {
    let outline = outline_gerber();
    let copper = copper_gerber();
    let drill = drill_excellon();
    make_zip(&[
        ("board.gtl", copper.as_bytes()),
        ("board.gbl", copper.as_bytes()),
        ("board.gko", outline.as_bytes()),
        ("board.drl", drill.as_bytes()),
    ])
}
