use crate::catalog::Garment;
use crate::catalog_store::CatalogStore;
use crate::pipeline::{DebugSink, PipelineStep, PreparedWeight, Weight};
use crate::profile::Profile;
use std::collections::BTreeMap;

/// A weight that gives preference to garments matching the formality levels
/// the user actually dresses for, scaled by how often they do.
pub struct FormalityWeight;

impl FormalityWeight {
    pub fn new() -> FormalityWeight {
        FormalityWeight
    }
}

impl Default for FormalityWeight {
    fn default() -> FormalityWeight {
        FormalityWeight::new()
    }
}

impl PipelineStep for FormalityWeight {
    fn name(&self) -> &str {
        "Formality"
    }

    fn slug(&self) -> &str {
        "formality"
    }
}

impl Weight for FormalityWeight {
    fn prepare(&self, profile: &Profile, store: &dyn CatalogStore) -> Box<dyn PreparedWeight> {
        let formality_weights = profile
            .expectations()
            .iter()
            .map(|(slug, frequency)| (slug.clone(), frequency.weight()))
            .collect();

        Box::new(PreparedFormalityWeight {
            formality_weights,
            formality_names: store.formality_names(),
        })
    }
}

struct PreparedFormalityWeight {
    /// Formality slug to the weight of the user's expectation for it.
    formality_weights: BTreeMap<String, f64>,
    formality_names: BTreeMap<String, String>,
}

impl PreparedWeight for PreparedFormalityWeight {
    fn score(&self, garment: &Garment, log: &mut dyn DebugSink) -> f64 {
        let mut total_weight = 0.0;

        for formality in &garment.formalities {
            let importance = match self.formality_weights.get(formality) {
                Some(weight) => *weight,
                None => continue,
            };
            total_weight += importance;

            if log.enabled() && importance > 0.0 {
                let name = self
                    .formality_names
                    .get(formality)
                    .map(|n| n.to_lowercase())
                    .unwrap_or_else(|| formality.clone());
                let reason = format!(
                    "The garment is {}, which the user wears {:.0}% of the time",
                    name,
                    importance * 100.0
                );
                log.record(&garment.slug, importance, reason);
            }
        }

        total_weight
    }
}
