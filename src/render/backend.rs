//! Geometry collaborator interface and the bundled minimal backend.
//!
//! The pipeline owns no geometry math: parsing and rasterization sit
//! behind [`GeometryBackend`] so the core can be driven by a stub in
//! tests or swapped for a full CAM library. The bundled
//! [`MinimalBackend`] understands enough of RS-274X and Excellon to
//! extract bounding geometry and draw recognizable previews: linear
//! draws, flashes, circular/rectangular apertures and drill hits. Arcs
//! are approximated by straight segments.

use regex::Regex;

use crate::error::{PipelineError, Result};
use crate::models::{BoundingBox, RawFile, Unit};
use crate::render::canvas::Canvas;
use crate::theme::LayerStyle;

/// Aperture shape for draws and flashes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aperture {
    /// Circle with diameter in native units
    Circle(f64),
    /// Rectangle with width and height in native units
    Rect(f64, f64),
}

impl Aperture {
    /// Stroke width when this aperture draws a line.
    fn stroke_width(self) -> f64 {
        match self {
            Self::Circle(d) => d,
            Self::Rect(w, h) => w.min(h),
        }
    }

    /// Half-extents for bounding purposes.
    fn half_extents(self) -> (f64, f64) {
        match self {
            Self::Circle(d) => (d / 2.0, d / 2.0),
            Self::Rect(w, h) => (w / 2.0, h / 2.0),
        }
    }
}

/// A drawing primitive in the layer's native units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Stroked segment
    Line {
        /// Start point
        x1: f64,
        /// Start point
        y1: f64,
        /// End point
        x2: f64,
        /// End point
        y2: f64,
        /// Stroke width
        width: f64,
    },
    /// Flashed pad or drill hit
    Flash {
        /// Center
        x: f64,
        /// Center
        y: f64,
        /// Flashed shape
        aperture: Aperture,
    },
}

/// Parsed layer geometry: primitives plus the coordinate unit they use.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Coordinate units for every primitive
    pub units: Unit,
    /// Drawing primitives in file order
    pub primitives: Vec<Primitive>,
}

/// Capability set the pipeline needs from a geometry library.
pub trait GeometryBackend: Sync {
    /// Parses a layer's drawing commands.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnparseableLayer`] when the file contains
    /// no recognizable drawing commands.
    fn parse(&self, file: &RawFile) -> Result<Geometry>;

    /// Combined bounding box of all primitives, in native units.
    fn bounding_box(&self, geometry: &Geometry) -> BoundingBox;

    /// Rasterizes geometry onto the shared canvas with the given style.
    ///
    /// # Errors
    ///
    /// Returns a backend-specific description; the orchestrator tags it
    /// with the offending filename.
    fn rasterize(
        &self,
        geometry: &Geometry,
        style: &LayerStyle,
        canvas: &mut Canvas,
    ) -> std::result::Result<(), String>;
}

/// The bundled subset parser/rasterizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalBackend;

impl MinimalBackend {
    fn unparseable(file: &RawFile, reason: impl Into<String>) -> PipelineError {
        PipelineError::UnparseableLayer {
            file: file.name.clone(),
            reason: reason.into(),
        }
    }

    fn parse_gerber(file: &RawFile, text: &str) -> Result<Geometry> {
        let fs_re = Regex::new(r"%FSLAX(\d)(\d)Y\d\d\*%").unwrap();
        let mo_re = Regex::new(r"%MO(MM|IN)\*%").unwrap();
        let ad_re = Regex::new(r"%ADD(\d+)([CRO]),([0-9.xX]+)\*%").unwrap();
        let word_re =
            Regex::new(r"^(?:G0?[123])?(?:X(-?\d+))?(?:Y(-?\d+))?D0?([123])$").unwrap();
        let select_re = Regex::new(r"^(?:G54)?D(\d\d+)$").unwrap();

        let mut units = Unit::Mm;
        let mut divisor = 10_000.0;
        let mut recognized = 0usize;

        if let Some(caps) = fs_re.captures(text) {
            let decimals: u32 = caps[2].parse().unwrap_or(4);
            divisor = f64::from(10_u32.pow(decimals.min(6)));
            recognized += 1;
        }
        if let Some(caps) = mo_re.captures(text) {
            units = if &caps[1] == "IN" { Unit::Inch } else { Unit::Mm };
            recognized += 1;
        }

        let mut apertures: Vec<(u32, Aperture)> = Vec::new();
        for caps in ad_re.captures_iter(text) {
            let code: u32 = caps[1].parse().unwrap_or(0);
            let params: Vec<f64> = caps[3]
                .split(['x', 'X'])
                .filter_map(|p| p.parse().ok())
                .collect();
            let aperture = match (&caps[2], params.as_slice()) {
                ("C", [d, ..]) => Aperture::Circle(*d),
                ("R" | "O", [w, h, ..]) => Aperture::Rect(*w, *h),
                _ => Aperture::Circle(0.1),
            };
            apertures.push((code, aperture));
            recognized += 1;
        }

        // Strip extended (%...%) blocks, then walk '*'-terminated words
        let ex_re = Regex::new(r"%[^%]*%").unwrap();
        let body = ex_re.replace_all(text, "\n");

        let mut primitives = Vec::new();
        let mut x = 0.0f64;
        let mut y = 0.0f64;
        let mut current = Aperture::Circle(0.1);

        for raw_word in body.split('*') {
            let word: String = raw_word.chars().filter(|c| !c.is_whitespace()).collect();
            if word.is_empty() || word.starts_with("G04") {
                continue;
            }
            if let Some(caps) = select_re.captures(&word) {
                let code: u32 = caps[1].parse().unwrap_or(0);
                if let Some((_, aperture)) = apertures.iter().find(|(c, _)| *c == code) {
                    current = *aperture;
                }
                recognized += 1;
                continue;
            }
            if let Some(caps) = word_re.captures(&word) {
                let nx = caps
                    .get(1)
                    .and_then(|m| m.as_str().parse::<f64>().ok())
                    .map_or(x, |v| v / divisor);
                let ny = caps
                    .get(2)
                    .and_then(|m| m.as_str().parse::<f64>().ok())
                    .map_or(y, |v| v / divisor);
                match &caps[3] {
                    "1" => primitives.push(Primitive::Line {
                        x1: x,
                        y1: y,
                        x2: nx,
                        y2: ny,
                        width: current.stroke_width(),
                    }),
                    "3" => primitives.push(Primitive::Flash {
                        x: nx,
                        y: ny,
                        aperture: current,
                    }),
                    // "2": move only
                    _ => {}
                }
                x = nx;
                y = ny;
                recognized += 1;
            }
        }

        if recognized == 0 {
            return Err(Self::unparseable(file, "no recognizable Gerber commands"));
        }
        Ok(Geometry { units, primitives })
    }

    fn parse_excellon(file: &RawFile, text: &str) -> Result<Geometry> {
        let tool_def_re = Regex::new(r"^T(\d+)C([0-9.]+)").unwrap();
        let tool_sel_re = Regex::new(r"^T(\d+)$").unwrap();
        let hit_re = Regex::new(r"^X(-?[0-9.]+)Y(-?[0-9.]+)$").unwrap();

        let mut units = Unit::Mm;
        let mut tools: Vec<(u32, f64)> = Vec::new();
        let mut current_dia = 1.0f64;
        let mut primitives = Vec::new();
        let mut recognized = 0usize;

        let parse_coord = |value: &str, units: Unit| -> Option<f64> {
            if value.contains('.') {
                value.parse().ok()
            } else {
                // Undotted coordinates: assume trailing-zero 3.3 metric /
                // 2.4 inch format
                let raw: f64 = value.parse().ok()?;
                Some(match units {
                    Unit::Mm => raw / 1_000.0,
                    Unit::Inch => raw / 10_000.0,
                })
            }
        };

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line {
                "M48" | "%" | "M30" | "M95" | "G90" | "G05" => {
                    recognized += 1;
                    continue;
                }
                "METRIC" | "M71" => {
                    units = Unit::Mm;
                    recognized += 1;
                    continue;
                }
                "INCH" | "M72" => {
                    units = Unit::Inch;
                    recognized += 1;
                    continue;
                }
                _ => {}
            }
            if line.starts_with("METRIC,") || line.starts_with("INCH,") {
                units = if line.starts_with("INCH") { Unit::Inch } else { Unit::Mm };
                recognized += 1;
                continue;
            }
            if let Some(caps) = tool_def_re.captures(line) {
                let code: u32 = caps[1].parse().unwrap_or(0);
                if let Ok(dia) = caps[2].parse::<f64>() {
                    tools.push((code, dia));
                    recognized += 1;
                }
                continue;
            }
            if let Some(caps) = tool_sel_re.captures(line) {
                let code: u32 = caps[1].parse().unwrap_or(0);
                if let Some((_, dia)) = tools.iter().find(|(c, _)| *c == code) {
                    current_dia = *dia;
                }
                recognized += 1;
                continue;
            }
            if let Some(caps) = hit_re.captures(line) {
                if let (Some(x), Some(y)) = (
                    parse_coord(&caps[1], units),
                    parse_coord(&caps[2], units),
                ) {
                    primitives.push(Primitive::Flash {
                        x,
                        y,
                        aperture: Aperture::Circle(current_dia),
                    });
                    recognized += 1;
                }
            }
        }

        if recognized == 0 {
            return Err(Self::unparseable(file, "no recognizable Excellon commands"));
        }
        Ok(Geometry { units, primitives })
    }
}

impl GeometryBackend for MinimalBackend {
    fn parse(&self, file: &RawFile) -> Result<Geometry> {
        let text = String::from_utf8_lossy(&file.bytes);
        if text.trim().is_empty() {
            return Err(Self::unparseable(file, "empty file"));
        }
        if text.contains("M48") {
            Self::parse_excellon(file, &text)
        } else {
            Self::parse_gerber(file, &text)
        }
    }

    fn bounding_box(&self, geometry: &Geometry) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for primitive in &geometry.primitives {
            match *primitive {
                Primitive::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    width,
                } => {
                    let half = width / 2.0;
                    bbox.include(x1 - half, y1 - half);
                    bbox.include(x1 + half, y1 + half);
                    bbox.include(x2 - half, y2 - half);
                    bbox.include(x2 + half, y2 + half);
                }
                Primitive::Flash { x, y, aperture } => {
                    let (hx, hy) = aperture.half_extents();
                    bbox.include(x - hx, y - hy);
                    bbox.include(x + hx, y + hy);
                }
            }
        }
        bbox
    }

    fn rasterize(
        &self,
        geometry: &Geometry,
        style: &LayerStyle,
        canvas: &mut Canvas,
    ) -> std::result::Result<(), String> {
        let factor = geometry.units.to_mm_factor();
        for primitive in &geometry.primitives {
            match *primitive {
                Primitive::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    width,
                } => canvas.stroke_line(
                    x1 * factor,
                    y1 * factor,
                    x2 * factor,
                    y2 * factor,
                    width * factor,
                    style.color,
                    style.alpha,
                ),
                Primitive::Flash { x, y, aperture } => match aperture {
                    Aperture::Circle(d) => canvas.fill_disc(
                        x * factor,
                        y * factor,
                        d * factor,
                        style.color,
                        style.alpha,
                    ),
                    Aperture::Rect(w, h) => canvas.fill_rect(
                        x * factor,
                        y * factor,
                        w * factor,
                        h * factor,
                        style.color,
                        style.alpha,
                    ),
                },
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GERBER_LINE: &str = "%FSLAX24Y24*%\n%MOMM*%\n%ADD10C,0.200*%\nD10*\nX0Y0D02*\nX1000000Y500000D01*\nM02*\n";

    const EXCELLON: &str = "M48\nMETRIC\nT1C1.000\n%\nT1\nX10.0Y20.0\nX30.0Y20.0\nM30\n";

    fn parse(name: &str, content: &str) -> Geometry {
        MinimalBackend
            .parse(&RawFile::new(name, content.as_bytes().to_vec()))
            .unwrap()
    }

    #[test]
    fn test_gerber_line_coordinates_and_units() {
        let geometry = parse("a.gtl", GERBER_LINE);
        assert_eq!(geometry.units, Unit::Mm);
        assert_eq!(
            geometry.primitives,
            vec![Primitive::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 100.0,
                y2: 50.0,
                width: 0.2,
            }]
        );
    }

    #[test]
    fn test_gerber_inch_units() {
        let content = GERBER_LINE.replace("%MOMM*%", "%MOIN*%");
        let geometry = parse("a.gtl", &content);
        assert_eq!(geometry.units, Unit::Inch);
    }

    #[test]
    fn test_gerber_flash_with_rect_aperture() {
        let content =
            "%FSLAX24Y24*%\n%MOMM*%\n%ADD11R,1.5X0.8*%\nD11*\nX50000Y50000D03*\nM02*\n";
        let geometry = parse("a.gtl", content);
        assert_eq!(
            geometry.primitives,
            vec![Primitive::Flash {
                x: 5.0,
                y: 5.0,
                aperture: Aperture::Rect(1.5, 0.8),
            }]
        );
    }

    #[test]
    fn test_gerber_bounding_box_includes_stroke_width() {
        let backend = MinimalBackend;
        let geometry = parse("a.gtl", GERBER_LINE);
        let bbox = backend.bounding_box(&geometry);
        assert!((bbox.min_x - -0.1).abs() < 1e-9);
        assert!((bbox.max_x - 100.1).abs() < 1e-9);
        assert!((bbox.max_y - 50.1).abs() < 1e-9);
    }

    #[test]
    fn test_excellon_hits() {
        let geometry = parse("a.drl", EXCELLON);
        assert_eq!(geometry.units, Unit::Mm);
        assert_eq!(geometry.primitives.len(), 2);
        assert_eq!(
            geometry.primitives[0],
            Primitive::Flash {
                x: 10.0,
                y: 20.0,
                aperture: Aperture::Circle(1.0),
            }
        );
    }

    #[test]
    fn test_excellon_undotted_metric_coordinates() {
        let content = "M48\nMETRIC\nT1C0.300\n%\nT1\nX012500Y030000\nM30\n";
        let geometry = parse("a.drl", content);
        assert_eq!(
            geometry.primitives[0],
            Primitive::Flash {
                x: 12.5,
                y: 30.0,
                aperture: Aperture::Circle(0.3),
            }
        );
    }

    #[test]
    fn test_junk_is_unparseable() {
        let err = MinimalBackend
            .parse(&RawFile::new("junk.gtl", b"hello world".to_vec()))
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::UnparseableLayer { ref file, .. } if file == "junk.gtl"
        ));
    }

    #[test]
    fn test_empty_file_is_unparseable() {
        assert!(MinimalBackend
            .parse(&RawFile::new("empty.gtl", Vec::new()))
            .is_err());
    }

    #[test]
    fn test_empty_but_valid_layer_has_degenerate_bbox() {
        let geometry = parse("a.gtl", "%FSLAX24Y24*%\n%MOMM*%\nM02*\n");
        assert!(geometry.primitives.is_empty());
        assert!(MinimalBackend.bounding_box(&geometry).is_degenerate());
    }
}
