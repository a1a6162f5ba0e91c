//! Hard visual-placement gate. A violation rejects the candidate
//! outright, independent of score; non-visual candidates always pass.

use crate::model::{MediaKind, ProductVariant};

/// Whether `candidate` may be placed after `row` (the items already in
/// the current row, left to right):
///
/// 1. a visual item never lands immediately after another visual item;
/// 2. at most two visual items per row;
/// 3. a campaign item joins a row holding a campaign only when the
///    campaign names match exactly;
/// 4. at most one video per row.
pub fn admits(row: &[&ProductVariant], candidate: &ProductVariant) -> bool {
    if !candidate.media.is_visual() {
        return true;
    }

    if let Some(last) = row.last() {
        if last.media.is_visual() {
            return false;
        }
    }

    if row.iter().filter(|p| p.media.is_visual()).count() >= 2 {
        return false;
    }

    if let MediaKind::Campaign { name } = &candidate.media {
        let existing = row.iter().find_map(|p| p.media.campaign_name());
        if let Some(existing) = existing {
            if existing != name.as_str() {
                return false;
            }
        }
    }

    if candidate.media == MediaKind::Video
        && row.iter().any(|p| p.media == MediaKind::Video)
    {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Age, Gender};
    use crate::normalize::{ColorFamily, GarmentCategory, Vibe};

    fn variant(key: &str, media: MediaKind) -> ProductVariant {
        ProductVariant {
            group_key: key.into(),
            commercial_code: key.chars().take(8).collect(),
            title: format!("Item {key}"),
            description: String::new(),
            media_url: "https://cdn.example.com/x.jpg".into(),
            color: "AZUL".into(),
            garment_type: "REMERA".into(),
            age: Some(Age::Kids),
            gender: Some(Gender::Unisex),
            sizes: vec![],
            stock_ecommerce: 1,
            stock_store: 0,
            ranking_analytics: 1,
            ranking_store: 1,
            new_in: None,
            family: None,
            media,
            has_stock: true,
            has_price: true,
            color_family: ColorFamily::Blue,
            category: GarmentCategory::Top,
            vibe: Vibe::CasualChic,
        }
    }

    fn campaign(key: &str, name: &str) -> ProductVariant {
        variant(key, MediaKind::Campaign { name: name.into() })
    }

    #[test]
    fn plain_products_always_pass() {
        let a = variant("A", MediaKind::Video);
        let b = variant("B", MediaKind::Product);
        assert!(admits(&[&a], &b));
    }

    #[test]
    fn no_adjacent_visuals() {
        let a = variant("A", MediaKind::Model);
        let b = variant("B", MediaKind::Video);
        assert!(!admits(&[&a], &b));

        let buffer = variant("C", MediaKind::Product);
        assert!(admits(&[&a, &buffer], &b));
    }

    #[test]
    fn at_most_two_visuals_per_row() {
        let a = variant("A", MediaKind::Model);
        let buffer = variant("B", MediaKind::Product);
        let c = variant("C", MediaKind::Video);
        let d = variant("D", MediaKind::Model);
        // A _ C already has two visuals; D is rejected even though the
        // adjacency rule alone would admit it after a buffer.
        assert!(!admits(&[&a, &buffer, &c, &buffer], &d));
    }

    #[test]
    fn campaign_names_must_match() {
        let a = campaign("A", "Verano");
        let buffer = variant("B", MediaKind::Product);
        assert!(!admits(&[&a, &buffer], &campaign("C", "Invierno")));
        assert!(admits(&[&a, &buffer], &campaign("C", "Verano")));
    }

    #[test]
    fn one_video_per_row() {
        let a = variant("A", MediaKind::Video);
        let buffer = variant("B", MediaKind::Product);
        let b = variant("C", MediaKind::Video);
        assert!(!admits(&[&a, &buffer], &b));
    }
}
