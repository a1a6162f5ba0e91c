//! Keyword-driven attribute normalizers.
//!
//! Each classifier is an ordered list of (keywords → category) rules
//! evaluated top to bottom against upper-cased free text; the first rule
//! with any keyword contained in the text wins, with an explicit default
//! when nothing matches. Table membership is a merchandising decision,
//! not an algorithmic one, so the tables are data and can be overridden
//! wholesale from the layout config.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorFamily {
    NeutralLight,
    NeutralDark,
    Denim,
    Blue,
    Pink,
    Red,
    Green,
    Yellow,
    Earth,
    Purple,
    Orange,
    Neon,
    Other,
    Unknown,
}

impl ColorFamily {
    /// Light/dark neutrals and denim read as background against any block.
    pub fn is_neutral(self) -> bool {
        matches!(self, Self::NeutralLight | Self::NeutralDark | Self::Denim)
    }

    /// Whether this family can anchor a row's color story.
    pub fn is_dominant(self) -> bool {
        !self.is_neutral() && self != Self::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GarmentCategory {
    Top,
    Bottom,
    FullBody,
    Outerwear,
    Shoes,
    Accessory,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vibe {
    Formal,
    Beach,
    CasualSport,
    CasualChic,
}

impl Vibe {
    /// Casual-chic is the versatile default; everything else is a theme.
    pub fn is_strong(self) -> bool {
        self != Self::CasualChic
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ColorRule {
    pub family: ColorFamily,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRule {
    pub category: GarmentCategory,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VibeRule {
    pub vibe: Vibe,
    pub keywords: Vec<String>,
}

/// The three classifier tables. Defaults reproduce the production lists.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    pub colors: Vec<ColorRule>,
    pub categories: Vec<CategoryRule>,
    pub vibes: Vec<VibeRule>,
}

fn kw(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        use ColorFamily as C;
        use GarmentCategory as G;
        use Vibe as V;

        let color = |family, words: &[&str]| ColorRule { family, keywords: kw(words) };
        let cat = |category, words: &[&str]| CategoryRule { category, keywords: kw(words) };
        let vibe = |vibe, words: &[&str]| VibeRule { vibe, keywords: kw(words) };

        Self {
            colors: vec![
                color(C::NeutralLight, &["BLANCO", "WHITE", "CRUDO", "MARFIL", "NATURAL"]),
                color(C::NeutralDark, &["NEGRO", "BLACK", "GRIS", "GREY", "MELANGE", "ACERO"]),
                color(C::Denim, &["JEAN", "DENIM", "INDIGO"]),
                color(C::Blue, &["AZUL", "BLUE", "MARINO", "CELESTE", "PETROLEO"]),
                color(C::Pink, &["ROSA", "PINK", "FUCSIA", "SALMON", "MAGENTA"]),
                color(C::Red, &["ROJO", "RED", "BORDO", "RUBI"]),
                color(C::Green, &["VERDE", "GREEN", "OLIVA", "MILITAR", "LIMA", "ESMERALDA"]),
                color(C::Yellow, &["AMARILLO", "YELLOW", "MOSTAZA", "OCRE"]),
                color(C::Earth, &["BEIGE", "ARENA", "CAMEL", "MARRON", "TOSTADO", "CHOCOLATE"]),
                color(C::Purple, &["VIOLETA", "LILA", "PURPURA", "UVA"]),
                color(C::Orange, &["NARANJA", "ORANGE", "CORAL"]),
                color(C::Neon, &["FLUOR", "NEON"]),
            ],
            categories: vec![
                cat(G::Top, &[
                    "REMERA", "BUZO", "CAMISA", "CHOMBA", "TOP", "CARDIGAN", "SWAETER",
                    "SWEATER", "POLERA", "MUSCULOSA",
                ]),
                cat(G::Bottom, &[
                    "PANTALON", "JEAN", "SHORT", "POLLERA", "CALZA", "BERMUDA", "JOGGING",
                    "FALDA",
                ]),
                cat(G::FullBody, &["VESTIDO", "ENTERITO", "JARDINERO", "MONO"]),
                cat(G::Outerwear, &["CAMPERA", "CHALECO", "SACO", "MONTGO", "ABRIGO", "PARKA"]),
                cat(G::Shoes, &[
                    "ZAPATILLA", "SANDALIA", "OJOTA", "BOTA", "CALZADO", "GUILLERMINA",
                ]),
            ],
            vibes: vec![
                vibe(V::Formal, &[
                    "LINO", "FIESTA", "SEDA", "VOILE", "VESTIR", "GASA", "ENCAJE",
                    "PUNTILLA", "SATEEN",
                ]),
                vibe(V::Beach, &[
                    "SUNNY", "PLAYA", "OJOTA", "MALLA", "BIKINI", "SHORTS DE BAÑO",
                    "TRAJE DE BAÑO", "FLUOR", "NEON", "TOALLA", "LONITA",
                ]),
                vibe(V::CasualSport, &[
                    "DEPORT", "JOGGING", "RUSTICO", "ACTIVE", "ALGODON", "BÁSICO",
                    "BASICO", "SPORT",
                ]),
            ],
        }
    }
}

impl Lexicon {
    /// Map a free-text color name to its family. Empty → `Unknown`,
    /// unmatched → `Other`.
    pub fn color_family(&self, color: &str) -> ColorFamily {
        if color.trim().is_empty() {
            return ColorFamily::Unknown;
        }
        let text = color.to_uppercase();
        for rule in &self.colors {
            if rule.keywords.iter().any(|k| text.contains(k.as_str())) {
                return rule.family;
            }
        }
        ColorFamily::Other
    }

    /// Map a garment-type string to its category. Empty → `Other`,
    /// unmatched → `Accessory`.
    pub fn category(&self, garment_type: &str) -> GarmentCategory {
        if garment_type.trim().is_empty() {
            return GarmentCategory::Other;
        }
        let text = garment_type.to_uppercase();
        for rule in &self.categories {
            if rule.keywords.iter().any(|k| text.contains(k.as_str())) {
                return rule.category;
            }
        }
        GarmentCategory::Accessory
    }

    /// Classify the combined title + garment-type text into a vibe,
    /// checked in table order. Unmatched → casual-chic.
    pub fn vibe(&self, title: &str, garment_type: &str) -> Vibe {
        let text = format!("{title} {garment_type}").to_uppercase();
        for rule in &self.vibes {
            if rule.keywords.iter().any(|k| text.contains(k.as_str())) {
                return rule.vibe;
            }
        }
        Vibe::CasualChic
    }
}
