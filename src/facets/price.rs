use crate::catalog_store::CatalogStore;
use crate::pipeline::{Facet, FacetGroup, PipelineStep, PreparedFacet, ScoredGarment};
use crate::profile::Profile;
use std::collections::BTreeMap;

/// The slugs of all available price groups.
pub const GROUP_LOW: &str = "low";
pub const GROUP_MEDIUM: &str = "medium";
pub const GROUP_HIGH: &str = "high";

/// The order of the price groups, by slug.
pub const PRICE_GROUP_ORDER: [&str; 3] = [GROUP_LOW, GROUP_MEDIUM, GROUP_HIGH];

/// A facet that groups a basic's ranked garments by price tier, using the
/// basic's budget and luxury price points. Ranking order is preserved within
/// each group; garments without price data appear in no group.
pub struct PriceFacet;

impl PriceFacet {
    pub fn new() -> PriceFacet {
        PriceFacet
    }
}

impl Default for PriceFacet {
    fn default() -> PriceFacet {
        PriceFacet::new()
    }
}

impl PipelineStep for PriceFacet {
    fn name(&self) -> &str {
        "Price"
    }

    fn slug(&self) -> &str {
        "price"
    }
}

impl Facet for PriceFacet {
    fn prepare(&self, _profile: &Profile, store: &dyn CatalogStore) -> Box<dyn PreparedFacet> {
        let basic_prices = store
            .basics()
            .into_iter()
            .map(|basic| {
                (
                    basic.slug,
                    PricePoints {
                        budget_end: basic.budget_end_cents as f64,
                        luxury_start: basic.luxury_start_cents as f64,
                    },
                )
            })
            .collect();

        Box::new(PreparedPriceFacet { basic_prices })
    }
}

#[derive(Debug, Clone, Copy)]
struct PricePoints {
    budget_end: f64,
    luxury_start: f64,
}

struct PreparedPriceFacet {
    basic_prices: BTreeMap<String, PricePoints>,
}

impl PreparedFacet for PreparedPriceFacet {
    fn group(&self, basic: &str, garments: &[ScoredGarment<'_>]) -> Vec<FacetGroup> {
        let mut low = Vec::new();
        let mut medium = Vec::new();
        let mut high = Vec::new();

        if let Some(points) = self.basic_prices.get(basic) {
            for scored in garments {
                let price = match scored.garment.average_price_cents() {
                    Some(price) => price,
                    None => continue,
                };
                let group = if price < points.budget_end {
                    &mut low
                } else if price >= points.luxury_start {
                    &mut high
                } else {
                    &mut medium
                };
                group.push(scored.garment.slug.clone());
            }
        }

        // Always emit all three groups, in the fixed order, even when empty.
        vec![
            FacetGroup {
                slug: GROUP_LOW.to_string(),
                garment_slugs: low,
            },
            FacetGroup {
                slug: GROUP_MEDIUM.to_string(),
                garment_slugs: medium,
            },
            FacetGroup {
                slug: GROUP_HIGH.to_string(),
                garment_slugs: high,
            },
        ]
    }
}
