mod basic;
#[allow(clippy::module_inception)]
mod catalog;
mod garment;
mod load;

pub use basic::{Basic, Formality, Propriety, ProprietyImportance, StandardSize, Style};
pub use catalog::{Catalog, CatalogBuildResult, CatalogData, Problem as LoadCatalogProblem};
pub use garment::{Brand, Care, Emphasis, Garment, PantRise, PurchaseOption, StockRecord};
pub use load::load_catalog;
