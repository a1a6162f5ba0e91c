//! Row/slot allocator: the greedy loop that fills rows of four from the
//! eligible pool, cycling through the configured row rules.
//!
//! Per slot the search runs up to three phases: exact garment-type match,
//! complementary category fallback, then a general fallback that ignores
//! targeting. All mutable state (used-set, hero-row bookkeeping, row
//! counters) is local to one `allocate` call, so concurrent runs never
//! interfere.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::config::{LayoutConfig, RowRule};
use crate::constraint;
use crate::model::ProductVariant;
use crate::score;

pub const ROW_WIDTH: usize = 4;

/// Default business ordering: e-commerce stock, analytics ranking, store
/// ranking, new-arrival recency (dated items first), store stock. Also
/// the tie-break inside the bounded scans, via stable sort + scan order.
pub fn base_order(a: &ProductVariant, b: &ProductVariant) -> Ordering {
    b.stock_ecommerce
        .cmp(&a.stock_ecommerce)
        .then_with(|| a.ranking_analytics.cmp(&b.ranking_analytics))
        .then_with(|| a.ranking_store.cmp(&b.ranking_store))
        .then_with(|| match (a.new_in, b.new_in) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.stock_store.cmp(&a.stock_store))
}

/// Pre-sort the pool: deprioritized items sink, hero media floats within
/// reach of the scan windows, then the base ordering.
pub fn presort(pool: &mut [ProductVariant], deprioritized: &HashSet<String>) {
    pool.sort_by(|a, b| {
        let a_low = deprioritized.contains(&a.group_key);
        let b_low = deprioritized.contains(&b.group_key);
        a_low
            .cmp(&b_low)
            .then_with(|| b.media.is_hero().cmp(&a.media.is_hero()))
            .then_with(|| base_order(a, b))
    });
}

/// Arrange the pool into the final ordering. Every item of the pool is
/// in the output exactly once: when the rule cycle stalls, the safety
/// bound trips and the remaining items are flushed in presort order.
pub fn allocate(
    mut pool: Vec<ProductVariant>,
    deprioritized: &HashSet<String>,
    config: &LayoutConfig,
) -> Vec<ProductVariant> {
    presort(&mut pool, deprioritized);

    let total = pool.len();
    let default_rule = RowRule::default();
    let rules: Vec<&RowRule> = if config.rows.is_empty() {
        vec![&default_rule]
    } else {
        config.rows.iter().collect()
    };

    let mut used = vec![false; total];
    let mut placed: Vec<usize> = Vec::with_capacity(total);
    // Seeded one gap back so the very first row may open with hero media.
    let mut last_hero_row = -i64::from(config.bounds.hero_row_gap);
    let row_limit = (total * config.bounds.row_limit_factor) as i64;
    let mut row_index: i64 = 0;

    while placed.len() < total {
        if row_index > row_limit {
            break;
        }
        let rule = rules[(row_index as usize) % rules.len()];
        let requested = rule.requested_types();
        let row_start = (placed.len() / ROW_WIDTH) * ROW_WIDTH;
        let mut row_has_hero = false;

        for slot in 0..ROW_WIDTH {
            if placed.len() >= total {
                break;
            }
            let row: Vec<&ProductVariant> =
                placed[row_start..].iter().map(|&i| &pool[i]).collect();
            let search = Search { pool: &pool, used: &used, config, deprioritized };
            let target = requested.get(slot).copied();

            let mut best = None;
            if let Some(target) = target {
                best = search.exact(&row, rule, target, slot, row_index, last_hero_row);
                if best.is_none() {
                    best = search.complementary(&row, rule, target);
                }
            }
            if best.is_none() {
                best = search.fallback(&row, rule);
            }

            if let Some((idx, _)) = best {
                used[idx] = true;
                if pool[idx].media.is_hero() {
                    row_has_hero = true;
                }
                placed.push(idx);
            }
        }

        if row_has_hero {
            last_hero_row = row_index;
        }
        row_index += 1;
    }

    let mut ordering: Vec<ProductVariant> = Vec::with_capacity(total);
    for &i in &placed {
        ordering.push(pool[i].clone());
    }
    for (i, v) in pool.iter().enumerate() {
        if !used[i] {
            ordering.push(v.clone());
        }
    }
    ordering
}

// ---------------------------------------------------------------------------
// Slot search
// ---------------------------------------------------------------------------

struct Search<'a> {
    pool: &'a [ProductVariant],
    used: &'a [bool],
    config: &'a LayoutConfig,
    deprioritized: &'a HashSet<String>,
}

impl Search<'_> {
    fn is_low(&self, v: &ProductVariant) -> bool {
        self.deprioritized.contains(&v.group_key)
    }

    /// Phase 1: exact garment-type match against the requested type.
    fn exact(
        &self,
        row: &[&ProductVariant],
        rule: &RowRule,
        target: &str,
        slot: usize,
        row_index: i64,
        last_hero_row: i64,
    ) -> Option<(usize, i64)> {
        let w = &self.config.weights;
        let b = &self.config.bounds;
        let target = target.to_lowercase();
        let mut best: Option<(usize, i64)> = None;
        let mut scanned: usize = 0;

        for (i, cand) in self.pool.iter().enumerate() {
            if self.used[i] {
                continue;
            }
            // The window only closes once something is held, so a sparse
            // type is still found deep in the pool.
            if scanned >= b.scan_window && best.is_some() {
                break;
            }
            if cand.garment_type.to_lowercase() != target {
                continue;
            }
            scanned += 1;

            if !constraint::admits(row, cand) {
                continue;
            }

            let total = score::demographic(rule, cand, w)
                + score::harmony(row, cand, self.is_low(cand), &w.harmony)
                + score::strategic_media(
                    cand,
                    slot,
                    row_index,
                    last_hero_row,
                    b.hero_row_gap,
                    &w.media,
                )
                + (w.phase.scan_bonus - scanned as i64);

            if best.map_or(true, |(_, s)| total > s) {
                best = Some((i, total));
            }
        }
        best
    }

    /// Phase 2: relax to the requested type's normalized category, but
    /// require exact rule demographics and never repeat the category of
    /// the slot immediately to the left.
    fn complementary(
        &self,
        row: &[&ProductVariant],
        rule: &RowRule,
        target: &str,
    ) -> Option<(usize, i64)> {
        let w = &self.config.weights;
        let b = &self.config.bounds;
        let intended = self.config.lexicon.category(target);
        let left_category = row.last().map(|p| p.category);
        let mut best: Option<(usize, i64)> = None;
        let mut scanned: usize = 0;

        for (i, cand) in self.pool.iter().enumerate() {
            if self.used[i] {
                continue;
            }
            if scanned >= b.scan_window && best.is_some() {
                break;
            }
            if let Some(age) = rule.age {
                if cand.age != Some(age) {
                    continue;
                }
            }
            if let Some(gender) = rule.gender {
                if cand.gender != Some(gender) {
                    continue;
                }
            }
            scanned += 1;

            if !constraint::admits(row, cand) {
                continue;
            }
            if left_category == Some(cand.category) {
                continue;
            }

            let complement = if cand.category == intended {
                w.phase.complement_exact
            } else {
                w.phase.complement_other
            };
            let total = complement
                + score::harmony(row, cand, self.is_low(cand), &w.harmony)
                + (w.phase.scan_bonus - scanned as i64);

            if best.map_or(true, |(_, s)| total > s) {
                best = Some((i, total));
            }
        }
        best
    }

    /// Phase 3: ignore targeting, take whatever fits the visual rules.
    /// The fixed penalty keeps targeted picks ahead when both exist.
    fn fallback(&self, row: &[&ProductVariant], rule: &RowRule) -> Option<(usize, i64)> {
        let w = &self.config.weights;
        let b = &self.config.bounds;
        let mut best: Option<(usize, i64)> = None;
        let mut scanned: usize = 0;

        for (i, cand) in self.pool.iter().enumerate() {
            if self.used[i] {
                continue;
            }
            if scanned > b.fallback_window {
                break;
            }
            scanned += 1;

            if !constraint::admits(row, cand) {
                continue;
            }

            let total = score::demographic(rule, cand, w)
                + score::harmony(row, cand, self.is_low(cand), &w.harmony)
                - w.phase.fallback_penalty;

            if best.map_or(true, |(_, s)| total > s) {
                best = Some((i, total));
            }
        }
        best
    }
}
