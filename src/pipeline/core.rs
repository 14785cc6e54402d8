//! Pipeline assembly and the recommendation orchestrator.

use super::debug::{DebugLog, NoopDebugSink};
use super::{
    validate_step, BasicRecommendations, BasicSummary, ConfigError, Facet, FacetGroup,
    GarmentExplanations, GarmentFilter, GarmentSummary, NormalizationNote, PipelineWeight,
    PreparedFacet, QueryFilter, RankedGarment, Recommendations, ScoredGarment, Weight,
    WeightExplanations,
};
use crate::catalog::{Basic, Garment};
use crate::catalog_store::CatalogStore;
use crate::config::EngineSettings;
use crate::facets::PriceFacet;
use crate::garment_filters::AvailabilityGarmentFilter;
use crate::profile::Profile;
use crate::query_filters::FormalityQueryFilter;
use crate::weights::{
    AgeWeight, BodyShapeWeight, CareWeight, FeaturedWeight, FormalityWeight, StyleWeight,
};
use std::collections::BTreeMap;
use tracing::debug;

/// The default importance boost for the style weight in the core pipeline.
const STYLE_IMPORTANCE: f64 = 2.0;

/// Assembles a [`Pipeline`], validating every stage's identity and
/// importance before any request can be served.
#[derive(Default)]
pub struct PipelineBuilder {
    query_filters: Vec<Box<dyn QueryFilter>>,
    garment_filters: Vec<Box<dyn GarmentFilter>>,
    weights: Vec<PipelineWeight>,
    facets: Vec<Box<dyn Facet>>,
    importance_overrides: BTreeMap<String, f64>,
}

impl PipelineBuilder {
    pub fn query_filter(mut self, filter: impl QueryFilter + 'static) -> Self {
        self.query_filters.push(Box::new(filter));
        self
    }

    pub fn garment_filter(mut self, filter: impl GarmentFilter + 'static) -> Self {
        self.garment_filters.push(Box::new(filter));
        self
    }

    pub fn weight(mut self, weight: impl Weight + 'static) -> Self {
        self.weights.push(PipelineWeight::new(weight));
        self
    }

    pub fn weight_with_importance(
        mut self,
        weight: impl Weight + 'static,
        importance: f64,
    ) -> Self {
        self.weights
            .push(PipelineWeight::with_importance(weight, importance));
        self
    }

    pub fn facet(mut self, facet: impl Facet + 'static) -> Self {
        self.facets.push(Box::new(facet));
        self
    }

    /// Replace the importance of the weight with the given slug. Applied at
    /// build time; naming a weight the pipeline does not carry is a
    /// configuration error.
    pub fn override_importance(mut self, slug: &str, importance: f64) -> Self {
        self.importance_overrides.insert(slug.to_string(), importance);
        self
    }

    pub fn build(mut self) -> Result<Pipeline, ConfigError> {
        for (slug, importance) in &self.importance_overrides {
            let weight = self
                .weights
                .iter_mut()
                .find(|pw| pw.stage.slug() == slug.as_str())
                .ok_or_else(|| ConfigError::UnknownWeightSlug(slug.clone()))?;
            weight.importance = *importance;
        }

        validate_kind(
            "query filter",
            self.query_filters.iter().map(|f| (f.name(), f.slug())),
        )?;
        validate_kind(
            "garment filter",
            self.garment_filters.iter().map(|f| (f.name(), f.slug())),
        )?;
        validate_kind(
            "weight",
            self.weights
                .iter()
                .map(|pw| (pw.stage.name(), pw.stage.slug())),
        )?;
        validate_kind("facet", self.facets.iter().map(|f| (f.name(), f.slug())))?;

        for pw in &self.weights {
            if !pw.importance.is_finite() || pw.importance <= 0.0 {
                return Err(ConfigError::InvalidImportance {
                    slug: pw.stage.slug().to_string(),
                    value: pw.importance,
                });
            }
        }

        Ok(Pipeline {
            query_filters: self.query_filters,
            garment_filters: self.garment_filters,
            weights: self.weights,
            facets: self.facets,
        })
    }
}

fn validate_kind<'a>(
    kind: &'static str,
    steps: impl Iterator<Item = (&'a str, &'a str)>,
) -> Result<(), ConfigError> {
    let mut seen = std::collections::HashSet::new();
    for (name, slug) in steps {
        validate_step(name, slug)?;
        if !seen.insert(slug.to_string()) {
            return Err(ConfigError::DuplicateSlug {
                kind,
                slug: slug.to_string(),
            });
        }
    }
    Ok(())
}

/// The staged recommendation pipeline.
///
/// A pipeline is assembled once and serves any number of requests; each
/// request gets its own prepared stage contexts, so concurrent callers never
/// share mutable state.
pub struct Pipeline {
    query_filters: Vec<Box<dyn QueryFilter>>,
    garment_filters: Vec<Box<dyn GarmentFilter>>,
    weights: Vec<PipelineWeight>,
    facets: Vec<Box<dyn Facet>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("query_filters", &self.query_filters.len())
            .field("garment_filters", &self.garment_filters.len())
            .field("weights", &self.weights.len())
            .field("facets", &self.facets.len())
            .finish()
    }
}

/// One weight stage's scores across the candidate set, with the observed
/// value range used for normalization.
struct StageRun {
    slug: String,
    name: String,
    importance: f64,
    raw: Vec<f64>,
    min: f64,
    max: f64,
    log: Option<DebugLog>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The core pipeline: formality reduction, availability filtering, all
    /// six weights, and the price facet, with any importance overrides and
    /// the age tail from the settings applied.
    pub fn core(settings: &EngineSettings) -> Result<Pipeline, ConfigError> {
        let mut builder = Pipeline::builder()
            .query_filter(FormalityQueryFilter::new())
            .garment_filter(AvailabilityGarmentFilter::new())
            .weight(AgeWeight::new(settings.age_tail_years))
            .weight(BodyShapeWeight::new())
            .weight(CareWeight::new())
            .weight(FeaturedWeight::new())
            .weight(FormalityWeight::new())
            .weight_with_importance(StyleWeight::new(), STYLE_IMPORTANCE)
            .facet(PriceFacet::new());

        for (slug, importance) in &settings.importance {
            builder = builder.override_importance(slug, *importance);
        }

        builder.build()
    }

    /// Generate recommendations for a profile against the store's candidate
    /// set. With `debug_mode` on, every ranked garment carries per-stage
    /// explanations; the scores themselves are identical either way.
    pub fn recommend(
        &self,
        profile: &Profile,
        store: &dyn CatalogStore,
        debug_mode: bool,
    ) -> Recommendations {
        let supplied = store.garments_for(profile);
        let mut candidates: Vec<&Garment> = supplied.iter().collect();
        let mut noop = NoopDebugSink;

        for query_filter in &self.query_filters {
            let prepared = query_filter.prepare(profile, store);
            let before = candidates.len();
            candidates = prepared.filter(candidates, &mut noop);
            debug!(
                stage = query_filter.slug(),
                before,
                after = candidates.len(),
                "applied query filter"
            );
        }

        for garment_filter in &self.garment_filters {
            let prepared = garment_filter.prepare(profile, store);
            let before = candidates.len();
            candidates.retain(|garment| !prepared.excludes(garment, &mut noop));
            debug!(
                stage = garment_filter.slug(),
                before,
                after = candidates.len(),
                "applied garment filter"
            );
        }

        // Score every candidate along every weight dimension, one pass per
        // stage, tracking the observed value range as we go.
        let mut runs: Vec<StageRun> = Vec::with_capacity(self.weights.len());
        for pipeline_weight in &self.weights {
            let prepared = pipeline_weight.stage.prepare(profile, store);
            let mut log = if debug_mode {
                Some(DebugLog::new())
            } else {
                None
            };
            let mut raw = Vec::with_capacity(candidates.len());
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for garment in &candidates {
                let value = match log.as_mut() {
                    Some(log) => prepared.score(garment, log),
                    None => prepared.score(garment, &mut noop),
                };
                min = min.min(value);
                max = max.max(value);
                raw.push(value);
            }
            debug!(
                stage = pipeline_weight.stage.slug(),
                min, max, "applied weight"
            );
            runs.push(StageRun {
                slug: pipeline_weight.stage.slug().to_string(),
                name: pipeline_weight.stage.name().to_string(),
                importance: pipeline_weight.importance,
                raw,
                min,
                max,
                log,
            });
        }

        // Combine the per-stage scores: min-max rescale each stage so no
        // weight's raw scale dominates, boost by the stage importance, and
        // sum per garment. A stage whose values are all equal contributes
        // its raw value unchanged.
        let mut combined = vec![0.0f64; candidates.len()];
        let mut notes: Vec<Vec<NormalizationNote>> = vec![Vec::new(); candidates.len()];
        for run in &runs {
            let range = run.max - run.min;
            for (i, raw) in run.raw.iter().enumerate() {
                let normalized = if range != 0.0 {
                    (raw - run.min) / range
                } else {
                    *raw
                };
                let contribution = normalized * run.importance;
                combined[i] += contribution;

                if debug_mode {
                    let mut note = if range != 0.0 {
                        format!("Normalized from {:.3} to {:.3}", raw, normalized)
                    } else {
                        format!("Kept a flat value of {:.3}", raw)
                    };
                    if run.importance > 1.0 {
                        note.push_str(&format!(
                            ", boosted by a {}x importance",
                            run.importance
                        ));
                    }
                    notes[i].push(NormalizationNote {
                        slug: run.slug.clone(),
                        contribution,
                        note,
                    });
                }
            }
        }

        // A single global max across every garment in every group keeps the
        // displayed scores comparable across basics; do not turn this into a
        // per-group normalization.
        let max_weight = combined.iter().fold(0.0f64, |acc, value| acc.max(*value));
        let scores: Vec<f64> = combined
            .iter()
            .map(|value| {
                if max_weight > 0.0 {
                    value / max_weight
                } else {
                    *value
                }
            })
            .collect();

        // Group by basic, preserving candidate order within each group.
        let mut by_basic: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, garment) in candidates.iter().enumerate() {
            by_basic.entry(garment.basic.clone()).or_default().push(i);
        }

        let basics: BTreeMap<String, Basic> = store
            .basics()
            .into_iter()
            .map(|basic| (basic.slug.clone(), basic))
            .collect();

        let prepared_facets: Vec<(String, Box<dyn PreparedFacet>)> = self
            .facets
            .iter()
            .map(|facet| (facet.slug().to_string(), facet.prepare(profile, store)))
            .collect();

        let mut out_basics = BTreeMap::new();
        for (basic_slug, mut indices) in by_basic {
            // Stable descending sort, so ties keep candidate-set order.
            indices.sort_by(|a, b| {
                scores[*b]
                    .partial_cmp(&scores[*a])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let scored: Vec<ScoredGarment<'_>> = indices
                .iter()
                .map(|&i| ScoredGarment {
                    garment: candidates[i],
                    score: scores[i],
                })
                .collect();

            let mut facets: BTreeMap<String, Vec<FacetGroup>> = BTreeMap::new();
            for (facet_slug, prepared) in &prepared_facets {
                facets.insert(facet_slug.clone(), prepared.group(&basic_slug, &scored));
            }

            let garments = indices
                .iter()
                .map(|&i| {
                    let garment = candidates[i];
                    let explanations = if debug_mode {
                        Some(GarmentExplanations {
                            weights: runs
                                .iter()
                                .map(|run| WeightExplanations {
                                    slug: run.slug.clone(),
                                    name: run.name.clone(),
                                    reasons: run
                                        .log
                                        .as_ref()
                                        .map(|log| log.for_subject(&garment.slug))
                                        .unwrap_or_default(),
                                })
                                .collect(),
                            normalization: notes[i].clone(),
                        })
                    } else {
                        None
                    };
                    RankedGarment {
                        garment: GarmentSummary {
                            slug: garment.slug.clone(),
                            name: garment.name.clone(),
                            brand: garment.brand.name.clone(),
                        },
                        score: scores[i],
                        explanations,
                    }
                })
                .collect();

            let basic_summary = match basics.get(&basic_slug) {
                Some(basic) => BasicSummary {
                    slug: basic.slug.clone(),
                    name: basic.name.clone(),
                },
                None => BasicSummary {
                    slug: basic_slug.clone(),
                    name: basic_slug.clone(),
                },
            };

            out_basics.insert(
                basic_slug,
                BasicRecommendations {
                    basic: basic_summary,
                    garments,
                    facets,
                },
            );
        }

        Recommendations { basics: out_basics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{PipelineStep, PreparedWeight};

    struct NamedWeight {
        name: &'static str,
        slug: &'static str,
    }

    impl PipelineStep for NamedWeight {
        fn name(&self) -> &str {
            self.name
        }

        fn slug(&self) -> &str {
            self.slug
        }
    }

    impl Weight for NamedWeight {
        fn prepare(&self, _profile: &Profile, _store: &dyn CatalogStore) -> Box<dyn PreparedWeight> {
            Box::new(DefaultPrepared)
        }
    }

    struct DefaultPrepared;
    impl PreparedWeight for DefaultPrepared {}

    #[test]
    fn builds_the_core_pipeline_with_defaults() {
        let pipeline = Pipeline::core(&EngineSettings::default()).unwrap();
        assert_eq!(pipeline.weights.len(), 6);
        assert_eq!(pipeline.query_filters.len(), 1);
        assert_eq!(pipeline.garment_filters.len(), 1);
        assert_eq!(pipeline.facets.len(), 1);

        let style = pipeline
            .weights
            .iter()
            .find(|pw| pw.stage.slug() == "style")
            .unwrap();
        assert_eq!(style.importance, STYLE_IMPORTANCE);
    }

    #[test]
    fn applies_importance_overrides_to_the_core_pipeline() {
        let mut settings = EngineSettings::default();
        settings.importance.insert("age".to_string(), 3.0);
        let pipeline = Pipeline::core(&settings).unwrap();
        let age = pipeline
            .weights
            .iter()
            .find(|pw| pw.stage.slug() == "age")
            .unwrap();
        assert_eq!(age.importance, 3.0);
    }

    #[test]
    fn rejects_overrides_for_unknown_weights() {
        let mut settings = EngineSettings::default();
        settings.importance.insert("sparkle".to_string(), 3.0);
        assert_eq!(
            Pipeline::core(&settings).unwrap_err(),
            ConfigError::UnknownWeightSlug("sparkle".to_string())
        );
    }

    #[test]
    fn rejects_steps_without_a_name() {
        let result = Pipeline::builder()
            .weight(NamedWeight { name: "", slug: "x" })
            .build();
        assert_eq!(
            result.err(),
            Some(ConfigError::MissingName {
                slug: "x".to_string()
            })
        );
    }

    #[test]
    fn rejects_steps_with_malformed_slugs() {
        let result = Pipeline::builder()
            .weight(NamedWeight {
                name: "X",
                slug: "Not A Slug",
            })
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidSlug { .. })));
    }

    #[test]
    fn rejects_duplicate_slugs_within_a_stage_kind() {
        let result = Pipeline::builder()
            .weight(NamedWeight {
                name: "A",
                slug: "same",
            })
            .weight(NamedWeight {
                name: "B",
                slug: "same",
            })
            .build();
        assert_eq!(
            result.err(),
            Some(ConfigError::DuplicateSlug {
                kind: "weight",
                slug: "same".to_string()
            })
        );
    }

    #[test]
    fn allows_the_same_slug_across_stage_kinds() {
        // The core pipeline itself carries a "formality" query filter and a
        // "formality" weight.
        assert!(Pipeline::core(&EngineSettings::default()).is_ok());
    }

    #[test]
    fn rejects_non_positive_importance() {
        let result = Pipeline::builder()
            .weight_with_importance(
                NamedWeight {
                    name: "X",
                    slug: "x",
                },
                0.0,
            )
            .build();
        assert_eq!(
            result.err(),
            Some(ConfigError::InvalidImportance {
                slug: "x".to_string(),
                value: 0.0
            })
        );
    }
}
