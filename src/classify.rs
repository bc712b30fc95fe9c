//! Filename-based layer classification.
//!
//! Gerber naming conventions are heterogeneous and mutually ambiguous, so
//! classification is an ordered, best-effort heuristic: each filename is
//! matched (case-insensitively) against a fixed rule table and the first
//! matching rule wins. Rule order is the documented precedence policy:
//!
//! 1. Protel-style extensions (`.gtl`, `.gbl`, `.gto`, `.gbo`, `.gts`,
//!    `.gbs`, `.gko`/`.gm1`, `.drl`/`.xln`, `.txt`)
//! 2. Descriptive substrings (`top copper`, `bottom solder resist`,
//!    `legend_top`, `soldermask_bot`, `profile`, `keep-out`, ...)
//! 3. Anchored bare side hints (names starting with `top.`/`bottom.`)
//!    as a last resort
//!
//! Classification is pure and never fails: a file matching no rule is
//! `LayerRole::Unknown`, which later stages drop with a log line.

use regex::Regex;
use tracing::debug;

use crate::models::{ClassifiedLayer, LayerRole, RawFile};

/// One ordered classification rule: a pattern over the lowercased filename
/// and the role it assigns.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    role: LayerRole,
}

impl Rule {
    /// Compiles a rule from a regex pattern.
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error for an invalid pattern.
    pub fn new(pattern: &str, role: LayerRole) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            role,
        })
    }
}

/// Ordered rule table. Rules are data, not code: new naming conventions
/// are added here without touching any call site.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

/// Built-in rule patterns in precedence order.
///
/// Extension rules come first because extensions are the least ambiguous
/// signal; descriptive substrings cover `.gbr`-suffixed exports; the bare
/// `top`/`bottom` hints are deliberately last and anchored to the start of
/// the name, since almost every layer name contains a side word somewhere.
const BUILTIN_RULES: &[(&str, LayerRole)] = &[
    // Protel/Altium extensions
    (r"\.gtl$", LayerRole::TopCopper),
    (r"\.gbl$", LayerRole::BottomCopper),
    (r"\.gto$", LayerRole::TopSilkscreen),
    (r"\.gbo$", LayerRole::BottomSilkscreen),
    (r"\.gts$", LayerRole::TopSoldermask),
    (r"\.gbs$", LayerRole::BottomSoldermask),
    (r"\.(gko|gm1)$", LayerRole::Outline),
    // Drill exports: .txt is the common Excellon export extension
    (r"\.(drl|xln|txt)$", LayerRole::Drill),
    // Descriptive names (KiCad, Eagle, DipTrace style exports)
    (r"top[ _.-]?copper", LayerRole::TopCopper),
    (r"bottom[ _.-]?copper", LayerRole::BottomCopper),
    (r"copper[ _.-]?top|f[ _.-]cu", LayerRole::TopCopper),
    (r"copper[ _.-]?bot(tom)?|b[ _.-]cu", LayerRole::BottomCopper),
    (
        r"top[ _.-]?solder|soldermask[ _.-]?top|f[ _.-]mask",
        LayerRole::TopSoldermask,
    ),
    (
        r"bottom[ _.-]?solder|soldermask[ _.-]?bot(tom)?|b[ _.-]mask",
        LayerRole::BottomSoldermask,
    ),
    (
        r"top[ _.-]?silk([ _.-]?screen)?|legend[ _.-]?top|f[ _.-]silks",
        LayerRole::TopSilkscreen,
    ),
    (
        r"bottom[ _.-]?silk([ _.-]?screen)?|legend[ _.-]?bot(tom)?|b[ _.-]silks",
        LayerRole::BottomSilkscreen,
    ),
    (
        r"outline|profile|mechanical|keep-?out|edge[ _.-]?cuts",
        LayerRole::Outline,
    ),
    (r"drill", LayerRole::Drill),
    // Anchored bare side hints for anonymous names like `top.gbr`. These
    // must not match mid-name: `paste_top.gbr` carries no renderable role
    // and has to stay Unknown rather than be painted as copper.
    (r"^top\.", LayerRole::TopCopper),
    (r"^bottom\.", LayerRole::BottomCopper),
];

impl RuleTable {
    /// Builds the built-in rule table.
    #[must_use]
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(pattern, role)| {
                // Built-in patterns are fixed and covered by tests
                Rule::new(pattern, *role).unwrap_or_else(|e| {
                    panic!("invalid built-in classification pattern '{pattern}': {e}")
                })
            })
            .collect();
        Self { rules }
    }

    /// Creates a table from caller-supplied rules, highest precedence first.
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Classifies a single filename. First matching rule wins; ties are
    /// broken by rule order, never by file order.
    #[must_use]
    pub fn classify_name(&self, name: &str) -> LayerRole {
        let lowered = name.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(&lowered))
            .map_or(LayerRole::Unknown, |rule| rule.role)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Classifies every file against the built-in rule table.
///
/// Pure and infallible: every input file yields exactly one
/// `ClassifiedLayer`, with `Unknown` as the terminal state for
/// unrecognized names.
#[must_use]
pub fn classify(files: Vec<RawFile>) -> Vec<ClassifiedLayer> {
    classify_with(&RuleTable::builtin(), files)
}

/// Classifies every file against a caller-supplied rule table.
#[must_use]
pub fn classify_with(table: &RuleTable, files: Vec<RawFile>) -> Vec<ClassifiedLayer> {
    files
        .into_iter()
        .map(|file| {
            let role = table.classify_name(&file.name);
            if role == LayerRole::Unknown {
                debug!(file = %file.name, "no classification rule matched");
            }
            ClassifiedLayer { file, role }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role_of(name: &str) -> LayerRole {
        RuleTable::builtin().classify_name(name)
    }

    #[test]
    fn test_protel_extensions() {
        assert_eq!(role_of("board.gtl"), LayerRole::TopCopper);
        assert_eq!(role_of("board.GBL"), LayerRole::BottomCopper);
        assert_eq!(role_of("board.gto"), LayerRole::TopSilkscreen);
        assert_eq!(role_of("board.gbo"), LayerRole::BottomSilkscreen);
        assert_eq!(role_of("board.gts"), LayerRole::TopSoldermask);
        assert_eq!(role_of("board.gbs"), LayerRole::BottomSoldermask);
        assert_eq!(role_of("board.gko"), LayerRole::Outline);
        assert_eq!(role_of("board.gm1"), LayerRole::Outline);
        assert_eq!(role_of("board.drl"), LayerRole::Drill);
        assert_eq!(role_of("board.txt"), LayerRole::Drill);
    }

    #[test]
    fn test_descriptive_names() {
        assert_eq!(role_of("Top Copper.gbr"), LayerRole::TopCopper);
        assert_eq!(role_of("bottom_copper.gbr"), LayerRole::BottomCopper);
        assert_eq!(role_of("Top Solder Resist.gbr"), LayerRole::TopSoldermask);
        assert_eq!(role_of("soldermask_bot.gbr"), LayerRole::BottomSoldermask);
        assert_eq!(role_of("legend_top.gbr"), LayerRole::TopSilkscreen);
        assert_eq!(role_of("Bottom Silk Screen.gbr"), LayerRole::BottomSilkscreen);
        assert_eq!(role_of("board-Edge_Cuts.gbr"), LayerRole::Outline);
        assert_eq!(role_of("profile.gbr"), LayerRole::Outline);
        assert_eq!(role_of("keep-out.gbr"), LayerRole::Outline);
        assert_eq!(role_of("drill.gbr"), LayerRole::Drill);
    }

    #[test]
    fn test_extension_beats_substring() {
        // `.gts` is soldermask even though the stem says "top"
        assert_eq!(role_of("top.gts"), LayerRole::TopSoldermask);
        // `.gbl` is bottom copper even with "outline" in the stem
        assert_eq!(role_of("outline_test.gbl"), LayerRole::BottomCopper);
    }

    #[test]
    fn test_bare_side_hints_are_last_resort() {
        assert_eq!(role_of("top.gbr"), LayerRole::TopCopper);
        assert_eq!(role_of("bottom.gbr"), LayerRole::BottomCopper);
    }

    #[test]
    fn test_solder_names_without_resist_are_soldermask() {
        assert_eq!(role_of("topsolder.gbr"), LayerRole::TopSoldermask);
        assert_eq!(role_of("bottomsolder.gbr"), LayerRole::BottomSoldermask);
        assert_eq!(role_of("top solder.gbr"), LayerRole::TopSoldermask);
    }

    #[test]
    fn test_paste_layers_are_never_copper() {
        // No paste role exists, so paste exports must stay Unknown instead
        // of falling through to the side hints
        assert_eq!(role_of("paste_top.gbr"), LayerRole::Unknown);
        assert_eq!(role_of("paste_bot.gbr"), LayerRole::Unknown);
    }

    #[test]
    fn test_side_hints_only_match_name_start() {
        assert_eq!(role_of("glue_top.gbr"), LayerRole::Unknown);
        assert_eq!(role_of("board_bottom_notes.gbr"), LayerRole::Unknown);
    }

    #[test]
    fn test_unmatched_is_unknown() {
        assert_eq!(role_of("readme.md"), LayerRole::Unknown);
        assert_eq!(role_of("photo.png"), LayerRole::Unknown);
    }

    #[test]
    fn test_classification_ignores_content() {
        // Role depends only on the name, never on the bytes
        let files = vec![
            RawFile::new("board.gtl", b"not even gerber".to_vec()),
            RawFile::new("board.gtl", Vec::new()),
        ];
        for layer in classify(files) {
            assert_eq!(layer.role, LayerRole::TopCopper);
        }
    }

    #[test]
    fn test_every_file_yields_one_layer() {
        let files = vec![
            RawFile::new("a.gtl", Vec::new()),
            RawFile::new("junk.bin", Vec::new()),
            RawFile::new("b.gko", Vec::new()),
        ];
        let layers = classify(files);
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[1].role, LayerRole::Unknown);
    }

    #[test]
    fn test_custom_table_precedence() {
        // A caller-supplied rule ahead of the built-ins changes the outcome
        let mut rules = vec![Rule::new(r"\.gtl$", LayerRole::Outline).unwrap()];
        rules.extend(RuleTable::builtin().rules);
        let table = RuleTable::new(rules);
        assert_eq!(table.classify_name("board.gtl"), LayerRole::Outline);
    }
}
