//! Pipeline wiring: synchronize, partition, allocate, assemble.

use std::collections::HashSet;

use crate::allocate::allocate;
use crate::classify::partition;
use crate::config::LayoutConfig;
use crate::model::{ArrangeMeta, ArrangeResult, ArrangeSummary, FeedInput};
use crate::sync::synchronize;

/// Run one arrangement. Pure and total: whatever the feeds look like,
/// every synchronized variant comes back exactly once; the worst case is
/// a degraded ordering, never an error.
pub fn run(config: &LayoutConfig, input: &FeedInput) -> ArrangeResult {
    let variants = synchronize(&input.catalog, &input.inventory, &config.lexicon);
    let part = partition(variants, &config.exclusions);

    let summary = ArrangeSummary {
        total: part.total(),
        eligible: part.eligible.len(),
        deprioritized: part.deprioritized.len(),
        invalid: part.invalid.len(),
        excluded: part.excluded.len(),
    };

    // Deprioritized variants were already split into their own tail
    // bucket, so the allocator's pool carries no low-priority keys.
    let mut ordering = allocate(part.eligible, &HashSet::new(), config);
    ordering.extend(part.deprioritized);
    ordering.extend(part.invalid);
    ordering.extend(part.excluded);

    ArrangeResult {
        meta: ArrangeMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        ordering,
    }
}
