//! Visual themes for board rendering.
//!
//! A theme is an enumerated, immutable mapping from layer role to visual
//! style, loaded at startup and passed explicitly through the pipeline
//! (never ambient global state) so per-request overrides and tests stay
//! trivial. Built-in themes mirror common fab soldermask colors; user
//! themes deserialize from TOML.

use serde::{Deserialize, Serialize};

use crate::models::LayerRole;

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbColor {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl RgbColor {
    /// Creates a color from channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Visual style bound to one layer role during rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    /// Fill/stroke color
    pub color: RgbColor,
    /// Opacity in [0, 1]
    pub alpha: f32,
}

impl LayerStyle {
    /// Creates an opaque style.
    #[must_use]
    pub const fn opaque(color: RgbColor) -> Self {
        Self { color, alpha: 1.0 }
    }

    /// Creates a style with explicit opacity.
    #[must_use]
    pub const fn with_alpha(color: RgbColor, alpha: f32) -> Self {
        Self { color, alpha }
    }
}

// Color constants lifted from common fab finishes
const FR4: RgbColor = RgbColor::new(74, 88, 0);
const HASL_COPPER: RgbColor = RgbColor::new(222, 217, 214);
const ENIG_COPPER: RgbColor = RgbColor::new(177, 136, 131);
const WHITE: RgbColor = RgbColor::new(255, 255, 255);
const BLACK: RgbColor = RgbColor::new(0, 0, 0);
const GREEN_MASK: RgbColor = RgbColor::new(0, 105, 71);
const PURPLE_MASK: RgbColor = RgbColor::new(51, 0, 85);
const RED_MASK: RgbColor = RgbColor::new(247, 43, 42);
const BLUE_MASK: RgbColor = RgbColor::new(15, 122, 166);
const MATTE_BLACK_MASK: RgbColor = RgbColor::new(13, 13, 15);
const DARK_SUBSTRATE: RgbColor = RgbColor::new(31, 31, 33);
const ENIG_BRIGHT_PAD: RgbColor = RgbColor::new(217, 179, 140);
const FLEX_POLYIMIDE: RgbColor = RgbColor::new(230, 166, 51);
const FLEX_COPPER: RgbColor = RgbColor::new(191, 128, 89);
const FLEX_AMBER: RgbColor = RgbColor::new(224, 153, 64);
const ALUMINUM_BASE: RgbColor = RgbColor::new(209, 212, 214);
const WHITE_MASK: RgbColor = RgbColor::new(235, 235, 235);

/// A named render theme: background plus one style per role family.
///
/// Top and bottom variants of a role share a style; the bottom-side
/// mirror transform lives in the canvas, not the theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Theme name used for selection
    pub name: String,
    /// Substrate background color
    pub background: RgbColor,
    /// Copper trace/pad style
    pub copper: LayerStyle,
    /// Soldermask style (drawn beneath copper)
    pub soldermask: LayerStyle,
    /// Silkscreen legend style
    pub silkscreen: LayerStyle,
    /// Drill hit style
    pub drill: LayerStyle,
    /// Board edge overlay style
    pub outline: LayerStyle,
}

impl Theme {
    /// The style bound to a role. `Unknown` never reaches rendering, but
    /// maps to the outline style as a harmless fallback.
    #[must_use]
    pub const fn style(&self, role: LayerRole) -> LayerStyle {
        match role {
            LayerRole::TopCopper | LayerRole::BottomCopper => self.copper,
            LayerRole::TopSoldermask | LayerRole::BottomSoldermask => self.soldermask,
            LayerRole::TopSilkscreen | LayerRole::BottomSilkscreen => self.silkscreen,
            LayerRole::Drill => self.drill,
            LayerRole::Outline | LayerRole::Unknown => self.outline,
        }
    }

    /// The default green-mask theme.
    #[must_use]
    pub fn default_theme() -> Self {
        Self {
            name: "green".to_string(),
            background: FR4,
            copper: LayerStyle::opaque(HASL_COPPER),
            soldermask: LayerStyle::with_alpha(GREEN_MASK, 0.85),
            silkscreen: LayerStyle::opaque(WHITE),
            drill: LayerStyle::opaque(BLACK),
            outline: LayerStyle::with_alpha(WHITE, 0.9),
        }
    }

    /// Looks up a built-in theme by name (case-insensitive).
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> {
        let mask_theme = |name: &str, mask: RgbColor, copper: RgbColor| Self {
            name: name.to_string(),
            background: FR4,
            copper: LayerStyle::opaque(copper),
            soldermask: LayerStyle::with_alpha(mask, 0.85),
            silkscreen: LayerStyle::opaque(WHITE),
            drill: LayerStyle::opaque(BLACK),
            outline: LayerStyle::with_alpha(WHITE, 0.9),
        };

        match name.to_lowercase().as_str() {
            "green" | "default" => Some(Self::default_theme()),
            "purple" => Some(mask_theme("purple", PURPLE_MASK, ENIG_COPPER)),
            "red" => Some(mask_theme("red", RED_MASK, HASL_COPPER)),
            "blue" => Some(mask_theme("blue", BLUE_MASK, HASL_COPPER)),
            "black" => Some(Self {
                name: "black".to_string(),
                background: DARK_SUBSTRATE,
                copper: LayerStyle::opaque(ENIG_BRIGHT_PAD),
                soldermask: LayerStyle::with_alpha(MATTE_BLACK_MASK, 0.92),
                silkscreen: LayerStyle::opaque(WHITE),
                drill: LayerStyle::opaque(BLACK),
                outline: LayerStyle::with_alpha(WHITE, 0.9),
            }),
            "flex" => Some(Self {
                name: "flex".to_string(),
                background: FLEX_POLYIMIDE,
                copper: LayerStyle::opaque(FLEX_COPPER),
                soldermask: LayerStyle::with_alpha(FLEX_AMBER, 0.85),
                silkscreen: LayerStyle::opaque(WHITE),
                drill: LayerStyle::opaque(BLACK),
                outline: LayerStyle::with_alpha(BLACK, 0.9),
            }),
            "aluminum" => Some(Self {
                name: "aluminum".to_string(),
                background: ALUMINUM_BASE,
                copper: LayerStyle::opaque(HASL_COPPER),
                soldermask: LayerStyle::with_alpha(WHITE_MASK, 0.8),
                silkscreen: LayerStyle::opaque(BLACK),
                drill: LayerStyle::opaque(BLACK),
                outline: LayerStyle::with_alpha(BLACK, 0.9),
            }),
            _ => None,
        }
    }

    /// Names of all built-in themes.
    #[must_use]
    pub const fn builtin_names() -> &'static [&'static str] {
        &["green", "purple", "red", "blue", "black", "flex", "aluminum"]
    }

    /// Resolves a requested theme name, falling back to the default with a
    /// log line rather than failing the request.
    #[must_use]
    pub fn resolve(name: Option<&str>) -> Self {
        match name {
            None => Self::default_theme(),
            Some(requested) => Self::builtin(requested).unwrap_or_else(|| {
                tracing::warn!(theme = requested, "unknown theme, using default");
                Self::default_theme()
            }),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_name_resolves() {
        for name in Theme::builtin_names() {
            assert!(Theme::builtin(name).is_some(), "missing builtin: {name}");
        }
    }

    #[test]
    fn test_builtin_lookup_is_case_insensitive() {
        assert_eq!(Theme::builtin("PURPLE"), Theme::builtin("purple"));
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        assert_eq!(Theme::resolve(Some("no-such-theme")).name, "green");
        assert_eq!(Theme::resolve(None).name, "green");
    }

    #[test]
    fn test_top_and_bottom_roles_share_styles() {
        let theme = Theme::default_theme();
        assert_eq!(
            theme.style(LayerRole::TopCopper),
            theme.style(LayerRole::BottomCopper)
        );
        assert_eq!(
            theme.style(LayerRole::TopSoldermask),
            theme.style(LayerRole::BottomSoldermask)
        );
    }

    #[test]
    fn test_theme_toml_roundtrip() {
        let theme = Theme::builtin("flex").unwrap();
        let toml = toml::to_string(&theme).unwrap();
        let parsed: Theme = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, theme);
    }
}
