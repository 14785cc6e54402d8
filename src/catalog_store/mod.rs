//! CatalogStore trait definition.
//!
//! This trait is the pipeline's only view of catalog data: the candidate
//! garments for a profile plus the reference data the stages precompute
//! their lookup tables from. The in-memory [`Catalog`] implements it; hosts
//! with their own storage can supply another implementation.

use crate::catalog::{Basic, Catalog, Garment};
use crate::profile::Profile;
use std::collections::BTreeMap;

/// Data-access surface consumed by the recommendation pipeline.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Candidate supply
    // =========================================================================

    /// The initial candidate set for a profile, with all garment attributes
    /// populated. The returned order is the order ties keep in the ranking.
    fn garments_for(&self, profile: &Profile) -> Vec<Garment>;

    // =========================================================================
    // Reference data
    // =========================================================================

    /// All basics, with their price points and proprieties.
    fn basics(&self) -> Vec<Basic>;

    /// Slugs of every formality level, in catalog order.
    fn formality_slugs(&self) -> Vec<String>;

    /// Slugs of every style.
    fn style_slugs(&self) -> Vec<String>;

    /// Slugs of every standard size.
    fn size_slugs(&self) -> Vec<String>;

    /// Formality slug to display name, for human-readable explanations.
    fn formality_names(&self) -> BTreeMap<String, String>;

    /// Style slug to display name, for human-readable explanations.
    fn style_names(&self) -> BTreeMap<String, String>;
}

impl CatalogStore for Catalog {
    fn garments_for(&self, _profile: &Profile) -> Vec<Garment> {
        self.garments().to_vec()
    }

    fn basics(&self) -> Vec<Basic> {
        Catalog::basics(self).to_vec()
    }

    fn formality_slugs(&self) -> Vec<String> {
        self.formalities().iter().map(|f| f.slug.clone()).collect()
    }

    fn style_slugs(&self) -> Vec<String> {
        self.styles().iter().map(|s| s.slug.clone()).collect()
    }

    fn size_slugs(&self) -> Vec<String> {
        self.sizes().iter().map(|s| s.slug.clone()).collect()
    }

    fn formality_names(&self) -> BTreeMap<String, String> {
        self.formalities()
            .iter()
            .map(|f| (f.slug.clone(), f.name.clone()))
            .collect()
    }

    fn style_names(&self) -> BTreeMap<String, String> {
        self.styles()
            .iter()
            .map(|s| (s.slug.clone(), s.name.clone()))
            .collect()
    }
}
