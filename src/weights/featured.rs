use crate::catalog::Garment;
use crate::catalog_store::CatalogStore;
use crate::pipeline::{DebugSink, PipelineStep, PreparedWeight, Weight};
use crate::profile::Profile;

/// The static weight for featured items.
const FEATURED_WEIGHT: f64 = 1.0;

/// A weight that gives a constant boost to any featured garments.
pub struct FeaturedWeight;

impl FeaturedWeight {
    pub fn new() -> FeaturedWeight {
        FeaturedWeight
    }
}

impl Default for FeaturedWeight {
    fn default() -> FeaturedWeight {
        FeaturedWeight::new()
    }
}

impl PipelineStep for FeaturedWeight {
    fn name(&self) -> &str {
        "Featured"
    }

    fn slug(&self) -> &str {
        "featured"
    }
}

impl Weight for FeaturedWeight {
    fn prepare(&self, _profile: &Profile, _store: &dyn CatalogStore) -> Box<dyn PreparedWeight> {
        Box::new(PreparedFeaturedWeight)
    }
}

struct PreparedFeaturedWeight;

impl PreparedWeight for PreparedFeaturedWeight {
    fn score(&self, garment: &Garment, log: &mut dyn DebugSink) -> f64 {
        if !garment.is_featured {
            return 0.0;
        }
        if log.enabled() {
            log.record(
                &garment.slug,
                FEATURED_WEIGHT,
                "The garment is marked as featured".to_string(),
            );
        }
        FEATURED_WEIGHT
    }
}
