use crate::catalog::Garment;
use crate::catalog_store::CatalogStore;
use crate::pipeline::{DebugSink, GarmentFilter, PipelineStep, PreparedGarmentFilter};
use crate::profile::Profile;
use std::collections::BTreeSet;

/// A filter that excludes garments not offered in any of the user's sizes.
pub struct AvailabilityGarmentFilter;

impl AvailabilityGarmentFilter {
    pub fn new() -> AvailabilityGarmentFilter {
        AvailabilityGarmentFilter
    }
}

impl Default for AvailabilityGarmentFilter {
    fn default() -> AvailabilityGarmentFilter {
        AvailabilityGarmentFilter::new()
    }
}

impl PipelineStep for AvailabilityGarmentFilter {
    fn name(&self) -> &str {
        "Availability"
    }

    fn slug(&self) -> &str {
        "availability"
    }
}

impl GarmentFilter for AvailabilityGarmentFilter {
    fn prepare(
        &self,
        profile: &Profile,
        _store: &dyn CatalogStore,
    ) -> Box<dyn PreparedGarmentFilter> {
        Box::new(PreparedAvailabilityFilter {
            sizes: profile.sizes().clone(),
        })
    }
}

struct PreparedAvailabilityFilter {
    sizes: BTreeSet<String>,
}

impl PreparedGarmentFilter for PreparedAvailabilityFilter {
    fn excludes(&self, garment: &Garment, _log: &mut dyn DebugSink) -> bool {
        !garment
            .stock_records
            .iter()
            .any(|record| record.is_available && self.sizes.contains(&record.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Brand, Emphasis, StockRecord};
    use crate::pipeline::NoopDebugSink;

    fn garment_with_stock(records: &[(&str, bool)]) -> Garment {
        Garment {
            slug: "g".to_string(),
            name: "G".to_string(),
            basic: "b".to_string(),
            brand: Brand {
                name: "Brand".to_string(),
                age_lower: None,
                age_upper: None,
            },
            shoulder_emphasis: Emphasis::Neutral,
            waist_emphasis: Emphasis::Neutral,
            hip_emphasis: Emphasis::Neutral,
            pant_rise: None,
            care: None,
            formalities: Default::default(),
            styles: Default::default(),
            is_featured: false,
            stock_records: records
                .iter()
                .map(|(size, is_available)| StockRecord {
                    size: size.to_string(),
                    is_available: *is_available,
                })
                .collect(),
            purchase_options: vec![],
        }
    }

    fn prepared_with_sizes(sizes: &[&str]) -> PreparedAvailabilityFilter {
        PreparedAvailabilityFilter {
            sizes: sizes.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn keeps_garments_stocked_in_a_requested_size() {
        let garment = garment_with_stock(&[("m", true), ("l", false)]);
        let prepared = prepared_with_sizes(&["m"]);
        assert!(!prepared.excludes(&garment, &mut NoopDebugSink));
    }

    #[test]
    fn excludes_garments_only_stocked_in_other_sizes() {
        let garment = garment_with_stock(&[("xs", true)]);
        let prepared = prepared_with_sizes(&["m", "l"]);
        assert!(prepared.excludes(&garment, &mut NoopDebugSink));
    }

    #[test]
    fn excludes_garments_whose_matching_sizes_are_out_of_stock() {
        let garment = garment_with_stock(&[("m", false)]);
        let prepared = prepared_with_sizes(&["m"]);
        assert!(prepared.excludes(&garment, &mut NoopDebugSink));
    }

    #[test]
    fn excludes_garments_without_stock_records() {
        let garment = garment_with_stock(&[]);
        let prepared = prepared_with_sizes(&["m"]);
        assert!(prepared.excludes(&garment, &mut NoopDebugSink));
    }
}
