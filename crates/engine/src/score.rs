//! Scoring components. All functions are pure: given the row built so
//! far and a candidate, each returns one scalar component of the total;
//! larger is better and components may be negative. Tuning lives in the
//! [`crate::config::Weights`] table, not here.

use crate::config::{AgeWeights, HarmonyWeights, MediaWeights, RowRule, Weights};
use crate::model::{Gender, MediaKind, ProductVariant};
use crate::normalize::GarmentCategory;

/// Demographic fit of a candidate against a row rule.
pub fn demographic(rule: &RowRule, candidate: &ProductVariant, w: &Weights) -> i64 {
    age_score(rule, candidate, &w.age) + gender_score(rule, candidate, w)
}

fn age_score(rule: &RowRule, candidate: &ProductVariant, w: &AgeWeights) -> i64 {
    let Some(rule_age) = rule.age else {
        return w.unconstrained;
    };
    let Some(age) = candidate.age else {
        return 0;
    };
    match rule_age.distance(age) {
        0 => w.exact,
        1 => w.adjacent,
        _ => w.distant,
    }
}

fn gender_score(rule: &RowRule, candidate: &ProductVariant, w: &Weights) -> i64 {
    let matches = match rule.gender {
        None => true,
        Some(g) => candidate.gender == Some(g),
    };
    if matches {
        w.gender.exact
    } else if rule.gender == Some(Gender::Unisex) || candidate.gender == Some(Gender::Unisex) {
        w.gender.unisex
    } else {
        w.gender.mismatch
    }
}

/// Visual/style cohesion of a candidate with the row built so far.
///
/// The row leader sets the vibe; the first non-neutral color in the row
/// is its dominant color. Deprioritized items take an overriding penalty
/// regardless of everything else.
pub fn harmony(
    row: &[&ProductVariant],
    candidate: &ProductVariant,
    deprioritized: bool,
    w: &HarmonyWeights,
) -> i64 {
    let mut score = 0;

    match row.first() {
        Some(leader) => {
            if leader.vibe.is_strong() {
                if candidate.vibe == leader.vibe {
                    score += w.vibe_shared;
                } else if candidate.vibe.is_strong() {
                    score += w.vibe_clash;
                } else {
                    score += w.vibe_plain;
                }
            } else if candidate.vibe.is_strong() {
                score += w.vibe_dilute;
            }
        }
        None => {
            if candidate.vibe.is_strong() {
                score += w.vibe_opener;
            }
        }
    }

    let dominant = row.iter().map(|p| p.color_family).find(|c| c.is_dominant());
    match dominant {
        Some(dominant) => {
            if candidate.color_family == dominant {
                score += w.color_block;
            } else if candidate.color_family.is_neutral() {
                score += w.color_neutral;
            } else {
                score += w.color_clash;
            }
        }
        None => {
            if candidate.color_family.is_dominant() {
                score += w.color_opener;
            }
        }
    }

    if let MediaKind::Campaign { name } = &candidate.media {
        if row.iter().any(|p| p.media.campaign_name() == Some(name.as_str())) {
            score += w.campaign_match;
        }
    }

    let row_has = |cat: GarmentCategory| row.iter().any(|p| p.category == cat);
    match candidate.category {
        GarmentCategory::Top if row_has(GarmentCategory::Bottom) => score += w.outfit_pair,
        GarmentCategory::Bottom if row_has(GarmentCategory::Top) => score += w.outfit_pair,
        GarmentCategory::Shoes
            if row_has(GarmentCategory::Top) || row_has(GarmentCategory::FullBody) =>
        {
            score += w.outfit_shoes
        }
        _ => {}
    }

    if deprioritized {
        score += w.deprioritized;
    }

    score
}

/// Strategic placement of hero media within the grid rhythm.
///
/// Heroes want the lead slot of a row at least `hero_row_gap` rows after
/// the previous hero row; a second hero fits slot 2 or 3. Model photos
/// are spacing-independent fillers.
pub fn strategic_media(
    candidate: &ProductVariant,
    slot: usize,
    row_index: i64,
    last_hero_row: i64,
    hero_row_gap: u32,
    w: &MediaWeights,
) -> i64 {
    let mut score = 0;

    if candidate.media.is_hero() {
        let rows_since = row_index - last_hero_row;
        if slot == 0 {
            if rows_since >= i64::from(hero_row_gap) {
                score += if candidate.media == MediaKind::Video {
                    w.video_lead
                } else {
                    w.campaign_lead
                };
            } else {
                score += w.crowded_lead;
            }
        } else if slot >= 2 {
            score += w.trailing_slot;
        } else {
            score += w.misplaced;
        }
    }

    if candidate.media == MediaKind::Model {
        score += w.model_fill;
    }

    score
}
