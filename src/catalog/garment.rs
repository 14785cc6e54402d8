use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How strongly a garment accentuates a body part.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    Weak,
    Neutral,
    Strong,
}

impl Emphasis {
    /// Ordinal rank used when measuring the distance between two emphases.
    pub fn rank(&self) -> u8 {
        match self {
            Emphasis::Weak => 0,
            Emphasis::Neutral => 1,
            Emphasis::Strong => 2,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Emphasis::Weak => "weak",
            Emphasis::Neutral => "neutral",
            Emphasis::Strong => "strong",
        }
    }
}

/// The rise of a pair of pants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PantRise {
    Low,
    Normal,
    High,
}

impl PantRise {
    pub fn display_name(&self) -> &'static str {
        match self {
            PantRise::Low => "low",
            PantRise::Normal => "normal",
            PantRise::High => "high",
        }
    }
}

/// Care instructions for a garment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Care {
    MachineWash,
    HandWash,
    DryClean,
}

impl Care {
    /// The two care types that demand real effort from the wearer.
    pub fn is_high_effort(&self) -> bool {
        matches!(self, Care::HandWash | Care::DryClean)
    }

    pub fn from_slug(slug: &str) -> Option<Care> {
        match slug {
            "machine_wash" => Some(Care::MachineWash),
            "hand_wash" => Some(Care::HandWash),
            "dry_clean" => Some(Care::DryClean),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Care::MachineWash => "machine wash",
            Care::HandWash => "hand wash",
            Care::DryClean => "dry clean",
        }
    }
}

/// The brand behind a garment, with its target age range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub name: String,
    #[serde(default)]
    pub age_lower: Option<u8>,
    #[serde(default)]
    pub age_upper: Option<u8>,
}

/// Per-size availability for a garment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub size: String,
    pub is_available: bool,
}

/// A way to buy a garment. The price is absent when the retailer has not
/// reported one yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOption {
    pub retailer: String,
    #[serde(default)]
    pub price_cents: Option<u32>,
}

/// A single item in the catalog. Garments are read-only inputs to the
/// recommendation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Garment {
    pub slug: String,
    pub name: String,
    /// Slug of the basic (garment role) this item belongs to.
    pub basic: String,
    pub brand: Brand,
    pub shoulder_emphasis: Emphasis,
    pub waist_emphasis: Emphasis,
    pub hip_emphasis: Emphasis,
    #[serde(default)]
    pub pant_rise: Option<PantRise>,
    #[serde(default)]
    pub care: Option<Care>,
    #[serde(default)]
    pub formalities: BTreeSet<String>,
    #[serde(default)]
    pub styles: BTreeSet<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub stock_records: Vec<StockRecord>,
    #[serde(default)]
    pub purchase_options: Vec<PurchaseOption>,
}

impl Garment {
    /// Average price across the purchase options that carry a price, or
    /// `None` when no option is priced.
    pub fn average_price_cents(&self) -> Option<f64> {
        let prices: Vec<u32> = self
            .purchase_options
            .iter()
            .filter_map(|option| option.price_cents)
            .collect();
        if prices.is_empty() {
            return None;
        }
        let total: u64 = prices.iter().map(|p| *p as u64).sum();
        Some(total as f64 / prices.len() as f64)
    }
}
