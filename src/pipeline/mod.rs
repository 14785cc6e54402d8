//! The recommendation pipeline: stage protocol, orchestrator, and output.
//!
//! Every stage kind shares the same two-phase contract: `prepare` derives a
//! profile-specific context once per recommendation request, and the
//! returned prepared stage applies the actual logic any number of times.
//! The orchestrator owns the prepared stages for the lifetime of one
//! request, so a stage's context is never rebuilt mid-request and never
//! shared across requests.

mod core;
mod debug;

pub use self::core::{Pipeline, PipelineBuilder};
pub use debug::{DebugLog, DebugSink, Explanation, NoopDebugSink};

use crate::catalog::Garment;
use crate::catalog_store::CatalogStore;
use crate::profile::Profile;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

lazy_static! {
    static ref SLUG_RE: Regex = Regex::new("^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();
}

/// A defect in how the pipeline or one of its stages was assembled. These
/// abort pipeline construction; they are never produced while serving a
/// request.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("pipeline step {slug:?} must define a name")]
    MissingName { slug: String },

    #[error("pipeline step {name:?} has an invalid slug {slug:?}")]
    InvalidSlug { name: String, slug: String },

    #[error("duplicate {kind} step slug {slug:?}")]
    DuplicateSlug { kind: &'static str, slug: String },

    #[error("weight {slug:?} must have a positive importance, got {value}")]
    InvalidImportance { slug: String, value: f64 },

    #[error("no weight with slug {0:?} to apply an importance override to")]
    UnknownWeightSlug(String),

    #[error("body shape table has no entry for {0:?}")]
    MissingBodyShape(String),

    #[error("unknown body shape {0:?} in weight table")]
    UnknownBodyShape(String),

    #[error("body shape table entry for {shape:?} is malformed: {detail}")]
    MalformedShapeEntry { shape: String, detail: String },
}

/// Identity shared by every pipeline stage kind.
pub trait PipelineStep {
    fn name(&self) -> &str;
    fn slug(&self) -> &str;
}

pub(crate) fn validate_step(name: &str, slug: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::MissingName {
            slug: slug.to_string(),
        });
    }
    if !SLUG_RE.is_match(slug) {
        return Err(ConfigError::InvalidSlug {
            name: name.to_string(),
            slug: slug.to_string(),
        });
    }
    Ok(())
}

/// Bulk exclusion over the whole candidate set, applied before any per-item
/// work.
pub trait QueryFilter: PipelineStep + Send + Sync {
    fn prepare(&self, profile: &Profile, store: &dyn CatalogStore) -> Box<dyn PreparedQueryFilter>;
}

pub trait PreparedQueryFilter {
    /// Reduce the candidate set. The default keeps every garment.
    fn filter<'a>(
        &self,
        garments: Vec<&'a Garment>,
        log: &mut dyn DebugSink,
    ) -> Vec<&'a Garment> {
        let _ = log;
        garments
    }
}

/// Boolean exclusion evaluated one candidate at a time.
pub trait GarmentFilter: PipelineStep + Send + Sync {
    fn prepare(&self, profile: &Profile, store: &dyn CatalogStore)
        -> Box<dyn PreparedGarmentFilter>;
}

pub trait PreparedGarmentFilter {
    /// Whether to exclude a single garment. The default excludes nothing.
    fn excludes(&self, garment: &Garment, log: &mut dyn DebugSink) -> bool {
        let _ = (garment, log);
        false
    }
}

/// A scalar scoring dimension. More positive is more desirable; values only
/// have meaning relative to the same weight's values for other garments.
pub trait Weight: PipelineStep + Send + Sync {
    fn prepare(&self, profile: &Profile, store: &dyn CatalogStore) -> Box<dyn PreparedWeight>;
}

pub trait PreparedWeight {
    /// The raw weight for a garment. The default contributes nothing.
    fn score(&self, garment: &Garment, log: &mut dyn DebugSink) -> f64 {
        let _ = (garment, log);
        0.0
    }
}

/// Post-ranking grouping of an already-sorted garment list for one basic.
pub trait Facet: PipelineStep + Send + Sync {
    fn prepare(&self, profile: &Profile, store: &dyn CatalogStore) -> Box<dyn PreparedFacet>;
}

pub trait PreparedFacet {
    /// Produce named subgroups for one basic's ranked garments, without
    /// altering their order. The default produces none.
    fn group(&self, basic: &str, garments: &[ScoredGarment<'_>]) -> Vec<FacetGroup> {
        let _ = (basic, garments);
        Vec::new()
    }
}

/// A garment together with its final score, as facets see it.
pub struct ScoredGarment<'a> {
    pub garment: &'a Garment,
    pub score: f64,
}

/// A weight stage plus the importance multiplier applied to its normalized
/// values during combination.
pub struct PipelineWeight {
    pub stage: Box<dyn Weight>,
    pub importance: f64,
}

impl PipelineWeight {
    pub fn new(stage: impl Weight + 'static) -> PipelineWeight {
        PipelineWeight {
            stage: Box::new(stage),
            importance: 1.0,
        }
    }

    pub fn with_importance(stage: impl Weight + 'static, importance: f64) -> PipelineWeight {
        PipelineWeight {
            stage: Box::new(stage),
            importance,
        }
    }
}

// =============================================================================
// Output types
// =============================================================================

/// One named facet subgroup: garment slugs in ranking order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetGroup {
    pub slug: String,
    pub garment_slugs: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BasicSummary {
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GarmentSummary {
    pub slug: String,
    pub name: String,
    pub brand: String,
}

/// Per-stage raw score explanations for one garment.
#[derive(Debug, Clone, Serialize)]
pub struct WeightExplanations {
    pub slug: String,
    pub name: String,
    pub reasons: Vec<Explanation>,
}

/// How a stage's normalized value contributed to one garment's combined
/// score.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizationNote {
    pub slug: String,
    pub contribution: f64,
    pub note: String,
}

/// Everything recorded about one garment's scoring, present only in debug
/// mode.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GarmentExplanations {
    pub weights: Vec<WeightExplanations>,
    pub normalization: Vec<NormalizationNote>,
}

/// A garment in the ranked output.
#[derive(Debug, Clone, Serialize)]
pub struct RankedGarment {
    pub garment: GarmentSummary,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanations: Option<GarmentExplanations>,
}

/// One basic's slice of the recommendations: its garments sorted by
/// descending score, plus the facet groupings over them.
#[derive(Debug, Clone, Serialize)]
pub struct BasicRecommendations {
    pub basic: BasicSummary,
    pub garments: Vec<RankedGarment>,
    pub facets: BTreeMap<String, Vec<FacetGroup>>,
}

/// The full recommendation output: plain data, ready for JSON encoding.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    pub basics: BTreeMap<String, BasicRecommendations>,
}
