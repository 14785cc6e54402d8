//! Builders for the shared test catalog and profiles.

use std::collections::BTreeMap;
use wardrobe_engine::catalog::{
    Basic, Brand, Care, Catalog, CatalogData, Emphasis, Formality, Garment, PantRise,
    Propriety, ProprietyImportance, PurchaseOption, StandardSize, StockRecord, Style,
};
use wardrobe_engine::profile::Profile;
use wardrobe_engine::RawProfile;

pub struct GarmentSpec {
    pub slug: &'static str,
    pub basic: &'static str,
    pub age_range: (u8, u8),
    pub care: Option<Care>,
    pub pant_rise: Option<PantRise>,
    pub formalities: &'static [&'static str],
    pub styles: &'static [&'static str],
    pub is_featured: bool,
    pub stocked_sizes: &'static [(&'static str, bool)],
    pub price_cents: Option<u32>,
}

impl Default for GarmentSpec {
    fn default() -> Self {
        GarmentSpec {
            slug: "garment",
            basic: "jeans",
            age_range: (20, 60),
            care: Some(Care::MachineWash),
            pant_rise: None,
            formalities: &["casual"],
            styles: &[],
            is_featured: false,
            stocked_sizes: &[("m", true)],
            price_cents: Some(8000),
        }
    }
}

pub fn build_garment(spec: GarmentSpec) -> Garment {
    Garment {
        slug: spec.slug.to_string(),
        name: spec.slug.to_string(),
        basic: spec.basic.to_string(),
        brand: Brand {
            name: "Brand".to_string(),
            age_lower: Some(spec.age_range.0),
            age_upper: Some(spec.age_range.1),
        },
        shoulder_emphasis: Emphasis::Neutral,
        waist_emphasis: Emphasis::Neutral,
        hip_emphasis: Emphasis::Neutral,
        pant_rise: spec.pant_rise,
        care: spec.care,
        formalities: spec.formalities.iter().map(|f| f.to_string()).collect(),
        styles: spec.styles.iter().map(|s| s.to_string()).collect(),
        is_featured: spec.is_featured,
        stock_records: spec
            .stocked_sizes
            .iter()
            .map(|(size, is_available)| StockRecord {
                size: size.to_string(),
                is_available: *is_available,
            })
            .collect(),
        purchase_options: spec
            .price_cents
            .into_iter()
            .map(|price| PurchaseOption {
                retailer: "Shop".to_string(),
                price_cents: Some(price),
            })
            .collect(),
    }
}

fn basic(slug: &str, budget_end: u32, luxury_start: u32, props: &[(&str, ProprietyImportance)]) -> Basic {
    Basic {
        slug: slug.to_string(),
        name: slug.to_string(),
        budget_end_cents: budget_end,
        luxury_start_cents: luxury_start,
        proprieties: props
            .iter()
            .map(|(formality, importance)| Propriety {
                formality: formality.to_string(),
                importance: *importance,
            })
            .collect(),
    }
}

/// A catalog with three basics and a spread of garments:
///
/// - `blazer` (executive-leaning): a featured dry-clean blazer, a pricey
///   all-rounder, and a budget casual one.
/// - `jeans` (casual): two stocked pairs with different rises, one pair in
///   no requested size, one unpriced pair, and an identical twin pair for
///   tie-order checks.
/// - `gown`: inappropriate at every formality, so the formality filter
///   drops it whenever the profile has expectations.
pub fn test_catalog() -> Catalog {
    let data = CatalogData {
        formalities: vec![
            Formality {
                slug: "casual".to_string(),
                name: "Casual".to_string(),
            },
            Formality {
                slug: "executive".to_string(),
                name: "Executive".to_string(),
            },
        ],
        styles: vec![
            Style {
                slug: "classic".to_string(),
                name: "Classic".to_string(),
            },
            Style {
                slug: "bold".to_string(),
                name: "Bold".to_string(),
            },
            Style {
                slug: "relaxed".to_string(),
                name: "Relaxed".to_string(),
            },
        ],
        sizes: vec![
            StandardSize {
                slug: "s".to_string(),
            },
            StandardSize {
                slug: "m".to_string(),
            },
            StandardSize {
                slug: "l".to_string(),
            },
        ],
        basics: vec![
            basic(
                "blazer",
                10000,
                30000,
                &[
                    ("executive", ProprietyImportance::Always),
                    ("casual", ProprietyImportance::Mildly),
                ],
            ),
            basic(
                "jeans",
                5000,
                20000,
                &[
                    ("casual", ProprietyImportance::Always),
                    ("executive", ProprietyImportance::Not),
                ],
            ),
            basic(
                "gown",
                20000,
                60000,
                &[
                    ("casual", ProprietyImportance::Not),
                    ("executive", ProprietyImportance::Not),
                ],
            ),
        ],
        garments: vec![
            build_garment(GarmentSpec {
                slug: "sharp-blazer",
                basic: "blazer",
                age_range: (30, 45),
                care: Some(Care::DryClean),
                formalities: &["executive"],
                styles: &["classic", "bold"],
                is_featured: true,
                price_cents: Some(18900),
                ..Default::default()
            }),
            build_garment(GarmentSpec {
                slug: "soft-blazer",
                basic: "blazer",
                age_range: (25, 60),
                formalities: &["executive", "casual"],
                styles: &["classic"],
                price_cents: Some(45000),
                ..Default::default()
            }),
            build_garment(GarmentSpec {
                slug: "budget-blazer",
                basic: "blazer",
                age_range: (18, 30),
                styles: &["relaxed"],
                price_cents: Some(4500),
                ..Default::default()
            }),
            build_garment(GarmentSpec {
                slug: "skinny-jeans",
                basic: "jeans",
                pant_rise: Some(PantRise::Low),
                styles: &["bold"],
                price_cents: Some(8000),
                ..Default::default()
            }),
            build_garment(GarmentSpec {
                slug: "mom-jeans",
                basic: "jeans",
                pant_rise: Some(PantRise::High),
                styles: &["classic", "relaxed"],
                price_cents: Some(12000),
                ..Default::default()
            }),
            build_garment(GarmentSpec {
                slug: "unavailable-jeans",
                basic: "jeans",
                stocked_sizes: &[("l", false), ("s", true)],
                ..Default::default()
            }),
            build_garment(GarmentSpec {
                slug: "unpriced-jeans",
                basic: "jeans",
                price_cents: None,
                ..Default::default()
            }),
            build_garment(GarmentSpec {
                slug: "twin-a",
                basic: "jeans",
                ..Default::default()
            }),
            build_garment(GarmentSpec {
                slug: "twin-b",
                basic: "jeans",
                ..Default::default()
            }),
            build_garment(GarmentSpec {
                slug: "velvet-gown",
                basic: "gown",
                formalities: &[],
                price_cents: Some(50000),
                ..Default::default()
            }),
        ],
        ..Default::default()
    };

    let result = Catalog::build(data);
    assert!(
        result.problems.is_empty(),
        "fixture catalog has problems: {:?}",
        result.problems
    );
    result.catalog.unwrap()
}

/// The standard test profile: a 35-year-old pear shape in size m who leans
/// casual, wears executive sometimes, likes classic and bold styles, and
/// avoids dry cleaning.
pub fn test_profile(catalog: &Catalog) -> Profile {
    profile_with_expectations(catalog, &[("casual", "often"), ("executive", "sometimes")])
}

pub fn profile_with_expectations(catalog: &Catalog, expectations: &[(&str, &str)]) -> Profile {
    let raw = RawProfile {
        age: 35,
        body_shape: "pear".to_string(),
        sizes: vec!["m".to_string()],
        styles: vec!["classic".to_string(), "bold".to_string()],
        avoid_care: vec!["dry_clean".to_string()],
        expectations: expectations
            .iter()
            .map(|(formality, frequency)| (formality.to_string(), frequency.to_string()))
            .collect::<BTreeMap<String, String>>(),
    };
    Profile::from_raw(raw, catalog).expect("fixture profile should validate")
}
