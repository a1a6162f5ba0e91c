//! Feed decoders: catalog markup and delimited inventory text, both taken
//! as in-memory strings. Malformed rows degrade instead of failing: an
//! entry without a derivable group key, or an inventory row whose field
//! count does not match the header, is dropped silently.

use chrono::NaiveDate;

use crate::error::EngineError;
use crate::model::{CatalogEntry, InventoryFeed, InventoryRow};

/// Marker the inventory feed uses for "no value".
const NOT_AVAILABLE: &str = "#N/A";

// ---------------------------------------------------------------------------
// Catalog feed
// ---------------------------------------------------------------------------

/// Decode catalog markup into entries.
///
/// Each `<item>` carries `<id>`, `<title>`, `<description>` and
/// `<image_link>`. Group key and commercial code are derived from the
/// URL's final path segment: the prefix before the first `_`, truncated
/// to 10 and 8 characters respectively. Entries whose derived group key
/// is empty are discarded. A reader error ends the scan with whatever
/// was collected so far.
pub fn decode_catalog(xml: &str) -> Vec<CatalogEntry> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut entries = Vec::new();
    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut buf = Vec::new();

    let mut in_item = false;
    let mut field: Option<&'static str> = None;
    let mut id = String::new();
    let mut title = String::new();
    let mut description = String::new();
    let mut media_url = String::new();
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"item" => {
                    in_item = true;
                    id.clear();
                    title.clear();
                    description.clear();
                    media_url.clear();
                }
                b"id" | b"title" | b"description" | b"image_link" if in_item => {
                    field = Some(match e.name().as_ref() {
                        b"id" => "id",
                        b"title" => "title",
                        b"description" => "description",
                        _ => "image_link",
                    });
                    text.clear();
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) if field.is_some() => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::CData(ref e)) if field.is_some() => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::End(ref e)) => {
                if e.name().as_ref() == b"item" {
                    if let Some(entry) = build_entry(&id, &title, &description, &media_url) {
                        entries.push(entry);
                    }
                    in_item = false;
                    field = None;
                    text.clear();
                } else if let Some(f) = field {
                    if f.as_bytes() == e.name().as_ref() {
                        let value = text.trim().to_string();
                        match f {
                            "id" => id = value,
                            "title" => title = value,
                            "description" => description = value,
                            _ => media_url = value,
                        }
                        field = None;
                        text.clear();
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    entries
}

fn build_entry(
    id: &str,
    title: &str,
    description: &str,
    media_url: &str,
) -> Option<CatalogEntry> {
    let file_name = media_url.rsplit('/').next().unwrap_or("");
    let prefix = file_name.split('_').next().unwrap_or("");
    let group_key: String = prefix.chars().take(10).collect();
    if group_key.is_empty() {
        return None;
    }
    let commercial_code: String = prefix.chars().take(8).collect();

    Some(CatalogEntry {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        media_url: media_url.to_string(),
        group_key,
        commercial_code,
    })
}

// ---------------------------------------------------------------------------
// Inventory feed
// ---------------------------------------------------------------------------

/// Decode the delimited inventory feed. First line is the header;
/// parsing is quote-aware (doubled quotes escape a literal quote).
///
/// Unparseable integers fall back to documented sentinels: rankings →
/// 9999, stocks and price → 0. Optional columns may be absent from the
/// header entirely; `#N/A` in a value position means "no value".
pub fn decode_inventory(text: &str) -> Result<InventoryFeed, EngineError> {
    let text = text.trim_start_matches('\u{feff}');
    if text.trim().is_empty() {
        return Err(EngineError::EmptyFeed);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|_| EngineError::EmptyFeed)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, EngineError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| EngineError::MissingColumn { column: name.into() })
    };
    let opt_idx = |name: &str| -> Option<usize> { headers.iter().position(|h| h == name) };

    let group_key_idx = idx("Grupo (Fórmula)")?;
    let commercial_code_idx = idx("Codigo Comercial")?;
    let garment_type_idx = idx("Tipo Prenda")?;
    let age_idx = idx("Edad")?;
    let gender_idx = idx("Género")?;
    let title_idx = idx("TITULO")?;
    let color_idx = idx("COLOR")?;
    let stock_ecommerce_idx = idx("STOCK ECOMMERCE")?;
    let stock_store_idx = idx("STOCK LOCALES")?;
    let ranking_analytics_idx = idx("Ranking Analytics")?;
    // The store ranking header ships misspelled in some exports.
    let ranking_store_idx = opt_idx("Ranking Locales")
        .or_else(|| opt_idx("Rankign Locales"))
        .ok_or_else(|| EngineError::MissingColumn { column: "Ranking Locales".into() })?;
    let image_loaded_idx = idx("IMAGEN CARGADA")?;

    let size_idx = opt_idx("TALLE");
    let price_idx = opt_idx("PRICE_CENTS");
    let new_in_idx = opt_idx("NEW IN");
    let campaign_idx = opt_idx("FOTO CAMPAÑA");
    let model_photo_idx = opt_idx("FOTO MODELO");
    let video_idx = opt_idx("VIDEO");

    let mut rows = Vec::new();

    for record in reader.records() {
        let Ok(record) = record else { continue };
        if record.len() != headers.len() {
            continue;
        }

        let raw: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();
        let field = |i: usize| raw[i].as_str();
        let opt_field = |i: Option<usize>| i.map(|i| raw[i].as_str()).unwrap_or("");

        rows.push(InventoryRow {
            group_key: field(group_key_idx).to_string(),
            commercial_code: field(commercial_code_idx).to_string(),
            garment_type: field(garment_type_idx).to_string(),
            age: field(age_idx).to_string(),
            gender: field(gender_idx).to_string(),
            title: field(title_idx).to_string(),
            color: field(color_idx).to_string(),
            size: opt_field(size_idx).to_string(),
            stock_ecommerce: int_or(field(stock_ecommerce_idx), 0).max(0),
            stock_store: int_or(field(stock_store_idx), 0).max(0),
            ranking_analytics: int_or(field(ranking_analytics_idx), 9999),
            ranking_store: int_or(field(ranking_store_idx), 9999),
            price_cents: int_or(opt_field(price_idx), 0).max(0),
            image_loaded: field(image_loaded_idx).eq_ignore_ascii_case("SI"),
            new_in: parse_new_in(opt_field(new_in_idx)),
            campaign: marker(opt_field(campaign_idx)),
            model_photo: marker(opt_field(model_photo_idx)).is_some(),
            video: marker(opt_field(video_idx)).is_some(),
            raw,
        });
    }

    Ok(InventoryFeed { headers, rows })
}

fn int_or(value: &str, sentinel: i64) -> i64 {
    value.trim().parse().unwrap_or(sentinel)
}

/// Optional marker column: empty or `#N/A` means absent.
fn marker(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == NOT_AVAILABLE {
        None
    } else {
        Some(value.to_string())
    }
}

/// `DD/MM/YYYY`, with `#N/A` (or anything unparseable) meaning "not new".
fn parse_new_in(value: &str) -> Option<NaiveDate> {
    let value = marker(value)?;
    let mut parts = value.split('/');
    let day: u32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let year: i32 = parts.next()?.trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
