//! Tail classification: split the synchronized variants into the pool
//! that feeds the allocator and the deterministic tail buckets.
//!
//! Bucket precedence per variant: excluded garment type first, then
//! missing stock/price/image, then deprioritized keyword match; whatever
//! remains is eligible. Final output order is eligible (arranged), then
//! deprioritized, then invalid (each sorted by title), then excluded in
//! input order. Every input variant lands in exactly one bucket.

use std::collections::HashSet;

use crate::config::Exclusions;
use crate::model::ProductVariant;

#[derive(Debug, Default)]
pub struct Partition {
    pub eligible: Vec<ProductVariant>,
    pub deprioritized: Vec<ProductVariant>,
    pub invalid: Vec<ProductVariant>,
    pub excluded: Vec<ProductVariant>,
}

impl Partition {
    pub fn total(&self) -> usize {
        self.eligible.len() + self.deprioritized.len() + self.invalid.len() + self.excluded.len()
    }
}

pub fn partition(variants: Vec<ProductVariant>, exclusions: &Exclusions) -> Partition {
    let excluded_types: HashSet<String> = exclusions
        .garment_types
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    let keywords = deprioritized_keywords(exclusions);

    let mut part = Partition::default();

    for variant in variants {
        if excluded_types.contains(&variant.garment_type.to_lowercase()) {
            part.excluded.push(variant);
        } else if !variant.has_stock || !variant.has_price || !variant.has_image() {
            part.invalid.push(variant);
        } else if matches_keywords(&variant, &keywords) {
            part.deprioritized.push(variant);
        } else {
            part.eligible.push(variant);
        }
    }

    part.deprioritized.sort_by(|a, b| a.title.cmp(&b.title));
    part.invalid.sort_by(|a, b| a.title.cmp(&b.title));
    part
}

/// Upper-cased, trimmed, non-empty keyword list from the config.
pub fn deprioritized_keywords(exclusions: &Exclusions) -> Vec<String> {
    exclusions
        .deprioritized
        .iter()
        .map(|k| k.trim().to_uppercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// A keyword matches against the title, the commercial code, or the
/// group key.
pub fn matches_keywords(variant: &ProductVariant, upper_keywords: &[String]) -> bool {
    if upper_keywords.is_empty() {
        return false;
    }
    let title = variant.title.to_uppercase();
    let code = variant.commercial_code.to_uppercase();
    let key = variant.group_key.to_uppercase();
    upper_keywords
        .iter()
        .any(|k| title.contains(k.as_str()) || code.contains(k.as_str()) || key.contains(k.as_str()))
}
