//! Synchronizer: join the two feeds into unified merchandising records.
//!
//! Inventory rows are grouped by their stripped group key in first-seen
//! order; the first row of each group is the representative for scalar
//! fields, while stock/price validity is judged across the whole group.
//! A catalog match contributes media and description; a miss leaves them
//! empty and the record is still produced. Validity is the tail
//! classifier's call, not the join's.

use std::collections::{BTreeSet, HashMap};

use crate::model::{Age, CatalogEntry, Gender, InventoryRow, MediaKind, ProductVariant};
use crate::normalize::Lexicon;

/// Build one [`ProductVariant`] per distinct group key. Rows with an
/// empty group key are dropped silently. Never fails.
pub fn synchronize(
    catalog: &[CatalogEntry],
    inventory: &[InventoryRow],
    lexicon: &Lexicon,
) -> Vec<ProductVariant> {
    let catalog_by_key: HashMap<&str, &CatalogEntry> = catalog
        .iter()
        .map(|entry| (entry.group_key.as_str(), entry))
        .collect();

    // Group in first-seen order; the order is visible downstream through
    // presort ties and the excluded tail.
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&InventoryRow>)> = Vec::new();

    for row in inventory {
        let key = row.stripped_group_key();
        if key.is_empty() {
            continue;
        }
        match group_index.get(&key) {
            Some(&i) => groups[i].1.push(row),
            None => {
                group_index.insert(key.clone(), groups.len());
                groups.push((key, vec![row]));
            }
        }
    }

    groups
        .into_iter()
        .map(|(key, rows)| build_variant(key, &rows, &catalog_by_key, lexicon))
        .collect()
}

fn build_variant(
    group_key: String,
    rows: &[&InventoryRow],
    catalog_by_key: &HashMap<&str, &CatalogEntry>,
    lexicon: &Lexicon,
) -> ProductVariant {
    let rep = rows[0];
    let entry = catalog_by_key.get(group_key.as_str());

    let has_stock = rows.iter().any(|r| r.stock_ecommerce > 0 || r.stock_store > 0);
    let has_price = rows.iter().any(|r| r.price_cents > 0);
    let stock_ecommerce: i64 = rows.iter().map(|r| r.stock_ecommerce).sum();
    let stock_store: i64 = rows.iter().map(|r| r.stock_store).sum();

    let sizes: BTreeSet<&str> = rows
        .iter()
        .map(|r| r.size.as_str())
        .filter(|s| !s.is_empty())
        .collect();

    let color_family = lexicon.color_family(&rep.color);
    let category = lexicon.category(&rep.garment_type);
    let vibe = lexicon.vibe(&rep.title, &rep.garment_type);

    ProductVariant {
        commercial_code: rep.commercial_code.clone(),
        title: rep.title.clone(),
        description: entry.map(|e| e.description.clone()).unwrap_or_default(),
        media_url: entry.map(|e| e.media_url.clone()).unwrap_or_default(),
        color: rep.color.clone(),
        garment_type: rep.garment_type.clone(),
        age: Age::parse(&rep.age),
        gender: Gender::parse(&rep.gender),
        sizes: sizes.into_iter().map(Into::into).collect(),
        stock_ecommerce,
        stock_store,
        ranking_analytics: rep.ranking_analytics,
        ranking_store: rep.ranking_store,
        new_in: rep.new_in,
        family: derive_family(&rep.title, &rep.garment_type),
        media: MediaKind::from_row(rep),
        has_stock,
        has_price,
        color_family,
        category,
        vibe,
        group_key,
    }
}

/// Last significant word of the title: stop-words, pure numbers, short
/// words, and the garment type itself are skipped.
fn derive_family(title: &str, garment_type: &str) -> Option<String> {
    const STOP_WORDS: &[&str] = &["DE", "Y", "A", "CON", "LA", "EL", "LOS", "LAS", "UN", "UNA"];
    let type_word = garment_type.trim().to_uppercase();
    let upper = title.to_uppercase();
    upper
        .split_whitespace()
        .filter(|w| {
            w.len() > 2
                && !STOP_WORDS.contains(w)
                && *w != type_word
                && w.parse::<f64>().is_err()
        })
        .last()
        .map(str::to_string)
}
