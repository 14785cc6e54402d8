//! Common test infrastructure
//!
//! This module provides the shared fixture catalog and profile builders the
//! end-to-end tests run against. Tests should only import from this module.

mod fixtures;

#[allow(unused_imports)]
pub use fixtures::{
    build_garment, profile_with_expectations, test_catalog, test_profile, GarmentSpec,
};
