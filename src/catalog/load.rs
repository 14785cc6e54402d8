//! Catalog loading functionality

use super::{Catalog, CatalogData};
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// Load a catalog from a JSON file, reporting any integrity problems.
///
/// Non-fatal problems (dangling style/formality/size references) are logged
/// and tolerated; fatal ones (duplicate slugs, garments pointing at unknown
/// basics) make the load fail.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {:?}", path))?;
    let data: CatalogData = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog file: {:?}", path))?;

    let result = Catalog::build(data);

    if !result.problems.is_empty() {
        warn!("Found {} problems:", result.problems.len());
        for problem in result.problems.iter() {
            warn!("- {:?}", problem);
        }
    }
    match (&result.catalog, result.problems.is_empty()) {
        (Some(_), true) => info!("Catalog checked, no issues found."),
        (Some(_), false) => info!(
            "Catalog was built, but check the {} non-fatal issues above.",
            result.problems.len()
        ),
        (None, _) => info!(
            "Check the {} problems above, the catalog could not be initialized.",
            result.problems.len()
        ),
    }

    if let Some(catalog) = result.catalog {
        info!(
            "Catalog has:\n{} basics\n{} garments",
            catalog.basic_count(),
            catalog.garment_count()
        );
        return Ok(catalog);
    }

    bail!("Could not load catalog from {:?}", path)
}
