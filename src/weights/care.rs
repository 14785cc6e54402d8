use crate::catalog::{Care, Garment};
use crate::catalog_store::CatalogStore;
use crate::pipeline::{DebugSink, PipelineStep, PreparedWeight, Weight};
use crate::profile::Profile;
use std::collections::BTreeSet;

/// The weight applied to garments whose care the user wants to avoid.
const BLACKLIST_WEIGHT: f64 = -1.0;

/// A weight that penalizes garments with high-effort care instructions the
/// user has asked to avoid. Low-effort care types never penalize, even when
/// listed.
pub struct CareWeight;

impl CareWeight {
    pub fn new() -> CareWeight {
        CareWeight
    }
}

impl Default for CareWeight {
    fn default() -> CareWeight {
        CareWeight::new()
    }
}

impl PipelineStep for CareWeight {
    fn name(&self) -> &str {
        "Care"
    }

    fn slug(&self) -> &str {
        "care"
    }
}

impl Weight for CareWeight {
    fn prepare(&self, profile: &Profile, _store: &dyn CatalogStore) -> Box<dyn PreparedWeight> {
        Box::new(PreparedCareWeight {
            avoid_care: profile.avoid_care().clone(),
        })
    }
}

struct PreparedCareWeight {
    avoid_care: BTreeSet<Care>,
}

impl PreparedWeight for PreparedCareWeight {
    fn score(&self, garment: &Garment, log: &mut dyn DebugSink) -> f64 {
        let care = match garment.care {
            Some(care) => care,
            None => return 0.0,
        };
        if !care.is_high_effort() || !self.avoid_care.contains(&care) {
            return 0.0;
        }

        if log.enabled() {
            let reason = format!("The garment has a care type of {}", care.display_name());
            log.record(&garment.slug, BLACKLIST_WEIGHT, reason);
        }

        BLACKLIST_WEIGHT
    }
}
