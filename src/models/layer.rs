//! Layer classification data structures.

use serde::{Deserialize, Serialize};

/// A single file extracted from an uploaded fabrication archive.
///
/// Immutable once created; the pipeline never mutates file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    /// Base filename as stored in the archive (no directory components)
    pub name: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl RawFile {
    /// Creates a new `RawFile` with the given name and contents.
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// The manufacturing role a single fabrication file plays on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerRole {
    /// Top copper (traces, pads)
    TopCopper,
    /// Bottom copper
    BottomCopper,
    /// Top silkscreen (legend)
    TopSilkscreen,
    /// Bottom silkscreen
    BottomSilkscreen,
    /// Top soldermask
    TopSoldermask,
    /// Bottom soldermask
    BottomSoldermask,
    /// Board outline / mechanical edge
    Outline,
    /// Drill hits (Excellon)
    Drill,
    /// No rule matched; excluded from stacks and outline resolution
    Unknown,
}

impl LayerRole {
    /// The board side this role belongs to.
    ///
    /// Outline and drill data are visible from both faces and carry
    /// `Side::None`; they are included in both render stacks.
    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Self::TopCopper | Self::TopSilkscreen | Self::TopSoldermask => Side::Top,
            Self::BottomCopper | Self::BottomSilkscreen | Self::BottomSoldermask => Side::Bottom,
            Self::Outline | Self::Drill | Self::Unknown => Side::None,
        }
    }

    /// Whether this role carries copper. A render stack with no copper
    /// for the requested side has nothing meaningful to show.
    #[must_use]
    pub const fn is_copper(self) -> bool {
        matches!(self, Self::TopCopper | Self::BottomCopper)
    }
}

impl std::fmt::Display for LayerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::TopCopper => "top copper",
            Self::BottomCopper => "bottom copper",
            Self::TopSilkscreen => "top silkscreen",
            Self::BottomSilkscreen => "bottom silkscreen",
            Self::TopSoldermask => "top soldermask",
            Self::BottomSoldermask => "bottom soldermask",
            Self::Outline => "outline",
            Self::Drill => "drill",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Which face of the board a layer (or a render) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Component side
    Top,
    /// Solder side
    Bottom,
    /// Side-agnostic (outline, drill)
    None,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Bottom => f.write_str("bottom"),
            Self::None => f.write_str("none"),
        }
    }
}

/// A `RawFile` together with its classified role.
///
/// Every extracted file produces exactly one `ClassifiedLayer`; `Unknown`
/// is a valid terminal classification, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLayer {
    /// The underlying file
    pub file: RawFile,
    /// Classified board role
    pub role: LayerRole,
}

impl ClassifiedLayer {
    /// The side derived from the classified role.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.role.side()
    }
}

/// Ordered layer sequence for one render, bottom-most first
/// (painter's-algorithm order: later entries draw over earlier ones).
#[derive(Debug, Clone)]
pub struct LayerStack {
    /// The face this stack renders
    pub side: Side,
    /// Layers in draw order
    pub layers: Vec<ClassifiedLayer>,
}

/// One rendered face of the board.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// Which face was rendered
    pub side: Side,
    /// PNG-encoded raster image
    pub image: Vec<u8>,
}
