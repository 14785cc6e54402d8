use crate::catalog::{Garment, ProprietyImportance};
use crate::catalog_store::CatalogStore;
use crate::pipeline::{DebugSink, PipelineStep, PreparedQueryFilter, QueryFilter};
use crate::profile::{Frequency, Profile};
use std::collections::{HashMap, HashSet};

/// A filter that excludes garments whose basic is inappropriate.
///
/// Appropriateness combines how strongly a basic is associated with a level
/// of formality and how frequently the user needs to dress at that level. A
/// basic is only dropped when it falls below the cutoff at every formality
/// level the user has an expectation for.
pub struct FormalityQueryFilter;

impl FormalityQueryFilter {
    pub fn new() -> FormalityQueryFilter {
        FormalityQueryFilter
    }
}

impl Default for FormalityQueryFilter {
    fn default() -> FormalityQueryFilter {
        FormalityQueryFilter::new()
    }
}

impl PipelineStep for FormalityQueryFilter {
    fn name(&self) -> &str {
        "Formality"
    }

    fn slug(&self) -> &str {
        "formality"
    }
}

impl QueryFilter for FormalityQueryFilter {
    fn prepare(&self, profile: &Profile, store: &dyn CatalogStore) -> Box<dyn PreparedQueryFilter> {
        // The weakest signal that still means anything: the lowest non-zero
        // value across both weight lookups.
        let cutoff = Frequency::ALL
            .iter()
            .map(|f| f.weight())
            .chain(ProprietyImportance::ALL.iter().map(|i| i.weight()))
            .filter(|w| *w > 0.0)
            .fold(f64::INFINITY, f64::min);

        // Formality slug to the propriety weight of every basic tied to it.
        let mut formality_weights: HashMap<String, HashMap<String, f64>> = HashMap::new();
        for basic in store.basics() {
            for propriety in &basic.proprieties {
                formality_weights
                    .entry(propriety.formality.clone())
                    .or_default()
                    .insert(basic.slug.clone(), propriety.importance.weight());
            }
        }

        let expectations: Vec<(String, f64)> = profile
            .expectations()
            .iter()
            .map(|(formality, frequency)| (formality.clone(), frequency.weight()))
            .collect();
        let formality_count = expectations.len();

        Box::new(PreparedFormalityQueryFilter {
            cutoff,
            formality_weights,
            expectations,
            formality_count,
        })
    }
}

struct PreparedFormalityQueryFilter {
    cutoff: f64,
    formality_weights: HashMap<String, HashMap<String, f64>>,
    /// Formality slug and the frequency weight the profile expects there.
    expectations: Vec<(String, f64)>,
    formality_count: usize,
}

impl PreparedQueryFilter for PreparedFormalityQueryFilter {
    fn filter<'a>(
        &self,
        garments: Vec<&'a Garment>,
        _log: &mut dyn DebugSink,
    ) -> Vec<&'a Garment> {
        // Count how many formality levels each basic falls below the cutoff
        // for, combining the basic/formality weight with the user's
        // frequency weight.
        let mut exclusion_counts: HashMap<&str, usize> = HashMap::new();
        for (formality, frequency_weight) in &self.expectations {
            let basics = match self.formality_weights.get(formality) {
                Some(basics) => basics,
                None => continue,
            };
            for (basic_slug, basic_weight) in basics {
                if basic_weight * frequency_weight < self.cutoff {
                    *exclusion_counts.entry(basic_slug.as_str()).or_insert(0) += 1;
                }
            }
        }

        // A basic is only excluded when it failed at every formality level
        // the profile specifies.
        let excluded_basics: HashSet<&str> = exclusion_counts
            .iter()
            .filter(|(_, count)| **count == self.formality_count)
            .map(|(slug, _)| *slug)
            .collect();

        if excluded_basics.is_empty() {
            return garments;
        }
        garments
            .into_iter()
            .filter(|garment| !excluded_basics.contains(garment.basic.as_str()))
            .collect()
    }
}
