use super::{Basic, Formality, Garment, StandardSize, Style};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The raw, serializable shape of a catalog file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub formalities: Vec<Formality>,
    #[serde(default)]
    pub styles: Vec<Style>,
    #[serde(default)]
    pub sizes: Vec<StandardSize>,
    #[serde(default)]
    pub basics: Vec<Basic>,
    #[serde(default)]
    pub garments: Vec<Garment>,
}

/// A defect found while building a catalog from raw data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    DuplicateFormality(String),
    DuplicateStyle(String),
    DuplicateSize(String),
    DuplicateBasic(String),
    DuplicateGarment(String),
    /// A garment points at a basic the catalog does not define. Fatal, since
    /// the pipeline groups its output by basic.
    UnknownBasic { garment: String, basic: String },
    /// A propriety points at an undefined formality. Non-fatal; the entry is
    /// kept but will never match an expectation.
    UnknownPropFormality { basic: String, formality: String },
    UnknownGarmentFormality { garment: String, formality: String },
    UnknownGarmentStyle { garment: String, style: String },
    UnknownGarmentSize { garment: String, size: String },
}

impl Problem {
    /// Fatal problems leave the catalog unusable; the rest are reported and
    /// tolerated.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Problem::DuplicateFormality(_)
                | Problem::DuplicateStyle(_)
                | Problem::DuplicateSize(_)
                | Problem::DuplicateBasic(_)
                | Problem::DuplicateGarment(_)
                | Problem::UnknownBasic { .. }
        )
    }
}

pub struct CatalogBuildResult {
    pub catalog: Option<Catalog>,
    pub problems: Vec<Problem>,
}

/// An in-memory clothing catalog: garments plus the reference data the
/// pipeline stages consume. Garment order is preserved from the input data,
/// which is also the order ties keep in the ranked output.
#[derive(Debug, Clone)]
pub struct Catalog {
    formalities: Vec<Formality>,
    styles: Vec<Style>,
    sizes: Vec<StandardSize>,
    basics: Vec<Basic>,
    garments: Vec<Garment>,
    basics_by_slug: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from raw data, checking its internal references.
    /// Returns the catalog (when usable) along with every problem found.
    pub fn build(data: CatalogData) -> CatalogBuildResult {
        let mut problems = Vec::new();

        check_duplicates(
            data.formalities.iter().map(|f| f.slug.as_str()),
            &mut problems,
            |slug| Problem::DuplicateFormality(slug),
        );
        check_duplicates(
            data.styles.iter().map(|s| s.slug.as_str()),
            &mut problems,
            |slug| Problem::DuplicateStyle(slug),
        );
        check_duplicates(
            data.sizes.iter().map(|s| s.slug.as_str()),
            &mut problems,
            |slug| Problem::DuplicateSize(slug),
        );
        check_duplicates(
            data.basics.iter().map(|b| b.slug.as_str()),
            &mut problems,
            |slug| Problem::DuplicateBasic(slug),
        );
        check_duplicates(
            data.garments.iter().map(|g| g.slug.as_str()),
            &mut problems,
            |slug| Problem::DuplicateGarment(slug),
        );

        let formality_slugs: HashSet<&str> =
            data.formalities.iter().map(|f| f.slug.as_str()).collect();
        let style_slugs: HashSet<&str> = data.styles.iter().map(|s| s.slug.as_str()).collect();
        let size_slugs: HashSet<&str> = data.sizes.iter().map(|s| s.slug.as_str()).collect();
        let basic_slugs: HashSet<&str> = data.basics.iter().map(|b| b.slug.as_str()).collect();

        for basic in &data.basics {
            for propriety in &basic.proprieties {
                if !formality_slugs.contains(propriety.formality.as_str()) {
                    problems.push(Problem::UnknownPropFormality {
                        basic: basic.slug.clone(),
                        formality: propriety.formality.clone(),
                    });
                }
            }
        }

        for garment in &data.garments {
            if !basic_slugs.contains(garment.basic.as_str()) {
                problems.push(Problem::UnknownBasic {
                    garment: garment.slug.clone(),
                    basic: garment.basic.clone(),
                });
            }
            for formality in &garment.formalities {
                if !formality_slugs.contains(formality.as_str()) {
                    problems.push(Problem::UnknownGarmentFormality {
                        garment: garment.slug.clone(),
                        formality: formality.clone(),
                    });
                }
            }
            for style in &garment.styles {
                if !style_slugs.contains(style.as_str()) {
                    problems.push(Problem::UnknownGarmentStyle {
                        garment: garment.slug.clone(),
                        style: style.clone(),
                    });
                }
            }
            for record in &garment.stock_records {
                if !size_slugs.contains(record.size.as_str()) {
                    problems.push(Problem::UnknownGarmentSize {
                        garment: garment.slug.clone(),
                        size: record.size.clone(),
                    });
                }
            }
        }

        if problems.iter().any(|p| p.is_fatal()) {
            return CatalogBuildResult {
                catalog: None,
                problems,
            };
        }

        let basics_by_slug = data
            .basics
            .iter()
            .enumerate()
            .map(|(i, b)| (b.slug.clone(), i))
            .collect();

        CatalogBuildResult {
            catalog: Some(Catalog {
                formalities: data.formalities,
                styles: data.styles,
                sizes: data.sizes,
                basics: data.basics,
                garments: data.garments,
                basics_by_slug,
            }),
            problems,
        }
    }

    pub fn formalities(&self) -> &[Formality] {
        &self.formalities
    }

    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    pub fn sizes(&self) -> &[StandardSize] {
        &self.sizes
    }

    pub fn basics(&self) -> &[Basic] {
        &self.basics
    }

    pub fn garments(&self) -> &[Garment] {
        &self.garments
    }

    pub fn basic(&self, slug: &str) -> Option<&Basic> {
        self.basics_by_slug.get(slug).map(|i| &self.basics[*i])
    }

    pub fn garment_count(&self) -> usize {
        self.garments.len()
    }

    pub fn basic_count(&self) -> usize {
        self.basics.len()
    }
}

fn check_duplicates<'a>(
    slugs: impl Iterator<Item = &'a str>,
    problems: &mut Vec<Problem>,
    make: impl Fn(String) -> Problem,
) {
    let mut seen = HashSet::new();
    for slug in slugs {
        if !seen.insert(slug) {
            problems.push(make(slug.to_string()));
        }
    }
}
