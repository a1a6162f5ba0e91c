use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::normalize::{ColorFamily, GarmentCategory, Vibe};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One entry decoded from the catalog/media feed.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub media_url: String,
    /// First 10 chars of the media URL's file-name prefix.
    pub group_key: String,
    /// First 8 chars of the same prefix.
    pub commercial_code: String,
}

/// One size/variant line decoded from the inventory/metrics feed.
#[derive(Debug, Clone)]
pub struct InventoryRow {
    /// Raw group-key field; may still carry `%` wrapper characters.
    pub group_key: String,
    pub commercial_code: String,
    pub garment_type: String,
    pub age: String,
    pub gender: String,
    pub title: String,
    pub color: String,
    pub size: String,
    pub stock_ecommerce: i64,
    pub stock_store: i64,
    pub ranking_analytics: i64,
    pub ranking_store: i64,
    pub price_cents: i64,
    pub image_loaded: bool,
    pub new_in: Option<NaiveDate>,
    pub campaign: Option<String>,
    pub model_photo: bool,
    pub video: bool,
    /// Raw field values in header order, kept for ordered re-export.
    pub raw: Vec<String>,
}

impl InventoryRow {
    /// Aggregation key: the group-key field with `%` wrappers stripped.
    pub fn stripped_group_key(&self) -> String {
        self.group_key.replace('%', "")
    }
}

/// Decoded inventory feed: header row plus the surviving data rows.
#[derive(Debug, Clone, Default)]
pub struct InventoryFeed {
    pub headers: Vec<String>,
    pub rows: Vec<InventoryRow>,
}

/// Pre-decoded feeds handed to [`crate::engine::run`].
pub struct FeedInput {
    pub catalog: Vec<CatalogEntry>,
    pub inventory: Vec<InventoryRow>,
}

// ---------------------------------------------------------------------------
// Demographics
// ---------------------------------------------------------------------------

/// Age bands, ordered youngest to oldest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Age {
    Bebe,
    Toddler,
    Kids,
}

impl Age {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "BEBE" => Some(Self::Bebe),
            "TODDLER" => Some(Self::Toddler),
            "KIDS" => Some(Self::Kids),
            _ => None,
        }
    }

    fn ordinal(self) -> i32 {
        match self {
            Self::Bebe => 0,
            Self::Toddler => 1,
            Self::Kids => 2,
        }
    }

    /// Band distance: 0 = same, 1 = adjacent, 2 = far.
    pub fn distance(self, other: Self) -> u32 {
        (self.ordinal() - other.ordinal()).unsigned_abs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Femenino,
    Masculino,
    Unisex,
}

impl Gender {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "FEMENINO" => Some(Self::Femenino),
            "MASCULINO" => Some(Self::Masculino),
            "UNISEX" => Some(Self::Unisex),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

/// Media classification, precedence CAMPAIGN > MODEL > VIDEO > PRODUCT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Product,
    Model,
    Video,
    Campaign { name: String },
}

impl MediaKind {
    /// Classify from the representative inventory row's media columns.
    pub fn from_row(row: &InventoryRow) -> Self {
        if let Some(name) = &row.campaign {
            Self::Campaign { name: name.clone() }
        } else if row.model_photo {
            Self::Model
        } else if row.video {
            Self::Video
        } else {
            Self::Product
        }
    }

    /// Anything beyond a plain product photo.
    pub fn is_visual(&self) -> bool {
        !matches!(self, Self::Product)
    }

    /// Attention-leading media: video or campaign photography.
    pub fn is_hero(&self) -> bool {
        matches!(self, Self::Video | Self::Campaign { .. })
    }

    pub fn campaign_name(&self) -> Option<&str> {
        match self {
            Self::Campaign { name } => Some(name),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Unified record
// ---------------------------------------------------------------------------

/// The unified merchandising record: one per distinct group key.
///
/// Created once per synchronization run. The group key is the identity and
/// is never recomputed; every field except the attached media is immutable
/// after creation.
#[derive(Debug, Clone, Serialize)]
pub struct ProductVariant {
    pub group_key: String,
    pub commercial_code: String,
    pub title: String,
    pub description: String,
    pub media_url: String,
    pub color: String,
    pub garment_type: String,
    pub age: Option<Age>,
    pub gender: Option<Gender>,
    /// Deduplicated, sorted size labels across all contributing rows.
    pub sizes: Vec<String>,
    pub stock_ecommerce: i64,
    pub stock_store: i64,
    pub ranking_analytics: i64,
    pub ranking_store: i64,
    pub new_in: Option<NaiveDate>,
    /// Last significant word of the title; groups sibling articles.
    pub family: Option<String>,
    pub media: MediaKind,
    pub has_stock: bool,
    pub has_price: bool,
    // Derived once at synchronization, consumed by scoring only.
    pub color_family: ColorFamily,
    pub category: GarmentCategory,
    pub vibe: Vibe,
}

impl ProductVariant {
    /// Whether media is actually attached (a catalog match was found).
    pub fn has_image(&self) -> bool {
        !self.media_url.is_empty()
    }

    /// Overwrite the attached media without touching identity.
    pub fn replace_media(&mut self, url: impl Into<String>, kind: MediaKind) {
        self.media_url = url.into();
        self.media = kind;
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ArrangeMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArrangeSummary {
    pub total: usize,
    pub eligible: usize,
    pub deprioritized: usize,
    pub invalid: usize,
    pub excluded: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArrangeResult {
    pub meta: ArrangeMeta,
    pub summary: ArrangeSummary,
    pub ordering: Vec<ProductVariant>,
}
