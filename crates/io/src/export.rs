// Ordered re-export: arranged variants back to the original CSV rows

use std::collections::HashMap;
use std::path::Path;

use planogrid_engine::model::{InventoryFeed, ProductVariant};

/// Re-serialize the inventory feed in arranged order: for each variant,
/// every contributing inventory row, in the order the rows appeared in
/// the feed. Output carries a UTF-8 BOM and quotes every field, matching
/// what the merchandising tooling downstream expects.
///
/// Rows whose group key produced no variant (empty key) are omitted.
pub fn ordered_csv(feed: &InventoryFeed, ordering: &[ProductVariant]) -> Result<String, String> {
    let mut rows_by_key: HashMap<String, Vec<&Vec<String>>> = HashMap::new();
    for row in &feed.rows {
        rows_by_key
            .entry(row.stripped_group_key())
            .or_default()
            .push(&row.raw);
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(&feed.headers).map_err(|e| e.to_string())?;
    for variant in ordering {
        if let Some(rows) = rows_by_key.get(&variant.group_key) {
            for raw in rows {
                writer.write_record(raw.iter()).map_err(|e| e.to_string())?;
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| e.to_string())?;
    let body = String::from_utf8(bytes).map_err(|e| e.to_string())?;
    Ok(format!("\u{feff}{body}"))
}

/// Write the ordered export to disk.
pub fn write_ordered_csv(
    path: &Path,
    feed: &InventoryFeed,
    ordering: &[ProductVariant],
) -> Result<(), String> {
    let content = ordered_csv(feed, ordering)?;
    std::fs::write(path, content).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use planogrid_engine::config::LayoutConfig;
    use planogrid_engine::decode::decode_inventory;
    use planogrid_engine::model::FeedInput;

    const FEED: &str = "\
Grupo (Fórmula),Codigo Comercial,Tipo Prenda,Edad,Género,TITULO,COLOR,STOCK ECOMMERCE,STOCK LOCALES,Ranking Analytics,Ranking Locales,IMAGEN CARGADA
%BBB0000001%,BBB00000,REMERA,KIDS,UNISEX,Remera B,AZUL,1,0,2,7,SI
%AAA0000001%,AAA00000,JEAN,KIDS,UNISEX,Jean A,AZUL,9,0,1,1,SI
%BBB0000001%,BBB00000,REMERA,KIDS,UNISEX,Remera B,AZUL,3,0,2,7,SI
";

    fn variant(key: &str) -> ProductVariant {
        let feed = decode_inventory(FEED).unwrap();
        let input = FeedInput { catalog: vec![], inventory: feed.rows };
        planogrid_engine::run(&LayoutConfig::default(), &input)
            .ordering
            .into_iter()
            .find(|v| v.group_key == key)
            .unwrap()
    }

    #[test]
    fn export_follows_arranged_order_with_row_multiplicity() {
        let feed = decode_inventory(FEED).unwrap();
        let ordering = vec![variant("BBB0000001"), variant("AAA0000001")];
        let out = ordered_csv(&feed, &ordering).unwrap();

        assert!(out.starts_with('\u{feff}'));
        let lines: Vec<&str> = out.trim_start_matches('\u{feff}').lines().collect();
        assert_eq!(lines.len(), 4, "header + 3 data rows");
        assert!(lines[0].starts_with("\"Grupo (Fórmula)\""));
        // Both BBB rows precede the AAA row.
        assert!(lines[1].contains("%BBB0000001%"));
        assert!(lines[2].contains("%BBB0000001%"));
        assert!(lines[3].contains("%AAA0000001%"));
        // Every field quoted.
        assert!(lines[3].starts_with("\"%AAA0000001%\",\"AAA00000\""));
    }

    #[test]
    fn export_skips_variants_without_rows() {
        let feed = decode_inventory(FEED).unwrap();
        let mut ghost = variant("AAA0000001");
        ghost.group_key = "GONE000000".into();
        let out = ordered_csv(&feed, &[ghost]).unwrap();
        let lines: Vec<&str> = out.trim_start_matches('\u{feff}').lines().collect();
        assert_eq!(lines.len(), 1, "header only");
    }
}
