use serde::Deserialize;

use crate::error::EngineError;
use crate::model::{Age, Gender};
use crate::normalize::Lexicon;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Targeting, composition, and tuning knobs for one arrangement run.
///
/// Every section is optional; an empty TOML document yields a fully
/// defaulted config (no row rules, no exclusions, stock weight table).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub name: String,
    /// Cyclic row targeting rules, consumed round-robin.
    pub rows: Vec<RowRule>,
    pub exclusions: Exclusions,
    pub weights: Weights,
    pub bounds: Bounds,
    pub lexicon: Lexicon,
}

/// One configured row: optional demographics plus up to four requested
/// garment types, one per slot.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RowRule {
    pub age: Option<Age>,
    pub gender: Option<Gender>,
    pub slots: Vec<String>,
}

impl RowRule {
    /// Requested types with blanks dropped, in slot order.
    pub fn requested_types(&self) -> Vec<&str> {
        self.slots
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Exclusions {
    /// Garment types forced to the very end of the ordering.
    pub garment_types: Vec<String>,
    /// Keywords/codes marking basic lines as deprioritized.
    pub deprioritized: Vec<String>,
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Bounds {
    /// Candidate scan window for the targeted phases. The scan keeps going
    /// past the window until at least one candidate is held.
    pub scan_window: usize,
    /// Hard scan window for the general fallback phase.
    pub fallback_window: usize,
    /// Minimum rows since the last hero row for the full lead-slot reward.
    pub hero_row_gap: u32,
    /// Allocation stops after `pool_len * row_limit_factor` rows.
    pub row_limit_factor: usize,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            scan_window: 300,
            fallback_window: 100,
            hero_row_gap: 2,
            row_limit_factor: 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Heuristic tuning constants for the scoring engine. Larger is better;
/// components may be negative. Override any subset from TOML; the rest
/// keep their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub age: AgeWeights,
    pub gender: GenderWeights,
    pub harmony: HarmonyWeights,
    pub media: MediaWeights,
    pub phase: PhaseWeights,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgeWeights {
    pub exact: i64,
    pub adjacent: i64,
    pub distant: i64,
    /// Flat bonus when the rule names no age at all.
    pub unconstrained: i64,
}

impl Default for AgeWeights {
    fn default() -> Self {
        Self { exact: 5000, adjacent: 2000, distant: 500, unconstrained: 2000 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenderWeights {
    pub exact: i64,
    /// Either side being unisex is an acceptable fallback.
    pub unisex: i64,
    pub mismatch: i64,
}

impl Default for GenderWeights {
    fn default() -> Self {
        Self { exact: 3000, unisex: 1500, mismatch: -10_000 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarmonyWeights {
    /// Candidate continues the row leader's strong vibe.
    pub vibe_shared: i64,
    /// Candidate brings a different strong vibe into a themed row.
    pub vibe_clash: i64,
    /// Default-vibe candidate inside a themed row.
    pub vibe_plain: i64,
    /// Strong-vibe candidate entering a row that opened versatile.
    pub vibe_dilute: i64,
    /// Strong-vibe candidate opening an empty row.
    pub vibe_opener: i64,
    /// Candidate matches the row's dominant color.
    pub color_block: i64,
    /// Neutral candidate laid into an existing color block.
    pub color_neutral: i64,
    /// Second strong color against the row's dominant one.
    pub color_clash: i64,
    /// First strong color into an all-neutral row.
    pub color_opener: i64,
    /// Campaign candidate matching a campaign already in the row.
    pub campaign_match: i64,
    /// Top next to a bottom, or bottom next to a top.
    pub outfit_pair: i64,
    /// Shoes alongside a top or full-body item.
    pub outfit_shoes: i64,
    /// Overriding penalty for deprioritized items.
    pub deprioritized: i64,
}

impl Default for HarmonyWeights {
    fn default() -> Self {
        Self {
            vibe_shared: 2000,
            vibe_clash: -10_000,
            vibe_plain: -500,
            vibe_dilute: -1000,
            vibe_opener: 500,
            color_block: 3000,
            color_neutral: 500,
            color_clash: -5000,
            color_opener: 1000,
            campaign_match: 5000,
            outfit_pair: 1000,
            outfit_shoes: 800,
            deprioritized: -50_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaWeights {
    /// Video in the lead slot with the hero spacing satisfied.
    pub video_lead: i64,
    /// Campaign photo in the lead slot with the spacing satisfied.
    pub campaign_lead: i64,
    /// Hero in the lead slot too soon after the previous hero row.
    pub crowded_lead: i64,
    /// Second hero landing in slot 2 or 3.
    pub trailing_slot: i64,
    /// Hero in slot 1.
    pub misplaced: i64,
    /// Flat filler bonus for model photography, spacing-independent.
    pub model_fill: i64,
}

impl Default for MediaWeights {
    fn default() -> Self {
        Self {
            video_lead: 50_000,
            campaign_lead: 45_000,
            crowded_lead: -20_000,
            trailing_slot: 5000,
            misplaced: -5000,
            model_fill: 2000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhaseWeights {
    /// Base of the earlier-scan-position bonus (minus the scan index).
    pub scan_bonus: i64,
    /// Phase-2 candidate in the same normalized category as requested.
    pub complement_exact: i64,
    /// Phase-2 candidate from any other category.
    pub complement_other: i64,
    /// Subtracted in phase 3 so targeted picks outrank untargeted ones.
    pub fallback_penalty: i64,
}

impl Default for PhaseWeights {
    fn default() -> Self {
        Self {
            scan_bonus: 500,
            complement_exact: 5000,
            complement_other: 2000,
            fallback_penalty: 2000,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl LayoutConfig {
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        let config: LayoutConfig =
            toml::from_str(input).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for (i, rule) in self.rows.iter().enumerate() {
            if rule.slots.len() > 4 {
                return Err(EngineError::ConfigValidation(format!(
                    "row rule {} requests {} slot types, a row has 4 slots",
                    i + 1,
                    rule.slots.len()
                )));
            }
        }

        if self.bounds.scan_window == 0 || self.bounds.fallback_window == 0 {
            return Err(EngineError::ConfigValidation(
                "scan windows must be at least 1".into(),
            ));
        }
        if self.bounds.row_limit_factor == 0 {
            return Err(EngineError::ConfigValidation(
                "row_limit_factor must be at least 1".into(),
            ));
        }

        // An empty keyword substring-matches everything and would swallow
        // every later rule in the table.
        let empty_keyword = self
            .lexicon
            .colors
            .iter()
            .flat_map(|r| r.keywords.iter())
            .chain(self.lexicon.categories.iter().flat_map(|r| r.keywords.iter()))
            .chain(self.lexicon.vibes.iter().flat_map(|r| r.keywords.iter()))
            .any(|k| k.trim().is_empty());
        if empty_keyword {
            return Err(EngineError::ConfigValidation(
                "lexicon keywords must be non-empty".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
