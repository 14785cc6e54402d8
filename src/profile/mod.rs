//! Wardrobe profile value object and its validation boundary.
//!
//! The pipeline only ever sees an already-valid [`Profile`]. Raw request
//! data enters through [`RawProfile`] and is checked against the catalog's
//! reference data; failures surface as a [`FormatError`] with per-field
//! messages for the caller.

use crate::catalog::Care;
use crate::catalog_store::CatalogStore;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// A user's body shape.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyShape {
    Apple,
    Hourglass,
    #[serde(rename = "inverted")]
    InvertedTriangle,
    Pear,
    Rectangle,
}

impl BodyShape {
    pub const ALL: [BodyShape; 5] = [
        BodyShape::Apple,
        BodyShape::Hourglass,
        BodyShape::InvertedTriangle,
        BodyShape::Pear,
        BodyShape::Rectangle,
    ];

    pub fn from_slug(slug: &str) -> Option<BodyShape> {
        match slug {
            "apple" => Some(BodyShape::Apple),
            "hourglass" => Some(BodyShape::Hourglass),
            "inverted" => Some(BodyShape::InvertedTriangle),
            "pear" => Some(BodyShape::Pear),
            "rectangle" => Some(BodyShape::Rectangle),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            BodyShape::Apple => "apple",
            BodyShape::Hourglass => "hourglass",
            BodyShape::InvertedTriangle => "inverted",
            BodyShape::Pear => "pear",
            BodyShape::Rectangle => "rectangle",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BodyShape::Apple => "apple",
            BodyShape::Hourglass => "hourglass",
            BodyShape::InvertedTriangle => "inverted triangle",
            BodyShape::Pear => "pear",
            BodyShape::Rectangle => "rectangle",
        }
    }
}

/// How often a user needs to dress at a level of formality.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Never,
    Rarely,
    Sometimes,
    Often,
    Always,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::Never,
        Frequency::Rarely,
        Frequency::Sometimes,
        Frequency::Often,
        Frequency::Always,
    ];

    pub fn from_slug(slug: &str) -> Option<Frequency> {
        match slug {
            "never" => Some(Frequency::Never),
            "rarely" => Some(Frequency::Rarely),
            "sometimes" => Some(Frequency::Sometimes),
            "often" => Some(Frequency::Often),
            "always" => Some(Frequency::Always),
            _ => None,
        }
    }

    /// Linear 0..1 weight by rank, so "never" carries no weight and
    /// "always" carries full weight.
    pub fn weight(&self) -> f64 {
        let rank = match self {
            Frequency::Never => 0,
            Frequency::Rarely => 1,
            Frequency::Sometimes => 2,
            Frequency::Often => 3,
            Frequency::Always => 4,
        };
        rank as f64 / (Self::ALL.len() - 1) as f64
    }
}

/// The untyped boundary shape of a profile, as received from a caller.
/// Enum-like fields stay strings here so that unknown values surface as
/// field-keyed validation messages rather than deserialization failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProfile {
    pub age: u8,
    pub body_shape: String,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub avoid_care: Vec<String>,
    /// Formality slug to frequency identifier.
    #[serde(default)]
    pub expectations: BTreeMap<String, String>,
}

/// Validation failure for a raw profile, keyed by field name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormatError {
    fields: BTreeMap<String, Vec<String>>,
}

impl FormatError {
    fn add(&mut self, field: &str, message: String) {
        self.fields.entry(field.to_string()).or_default().push(message);
    }

    fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages grouped by the field they apply to.
    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let summary = self
            .fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join("; ")))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "invalid profile: {}", summary)
    }
}

impl std::error::Error for FormatError {}

/// A validated wardrobe profile. Immutable once constructed; the pipeline
/// reads it through the accessors below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    age: u8,
    body_shape: BodyShape,
    sizes: BTreeSet<String>,
    styles: BTreeSet<String>,
    avoid_care: BTreeSet<Care>,
    expectations: BTreeMap<String, Frequency>,
}

impl Profile {
    /// Validate raw profile data against the catalog's reference data.
    ///
    /// All fields are checked before returning, so a caller gets every
    /// problem in one pass.
    pub fn from_raw(raw: RawProfile, store: &dyn CatalogStore) -> Result<Profile, FormatError> {
        let mut error = FormatError::default();

        if raw.age == 0 {
            error.add("age", "age must be greater than zero".to_string());
        }

        let body_shape = BodyShape::from_slug(&raw.body_shape);
        if body_shape.is_none() {
            error.add(
                "body_shape",
                format!("unknown body shape: {:?}", raw.body_shape),
            );
        }

        let known_sizes: HashSet<String> = store.size_slugs().into_iter().collect();
        let mut sizes = BTreeSet::new();
        for size in &raw.sizes {
            if known_sizes.contains(size) {
                sizes.insert(size.clone());
            } else {
                error.add("sizes", format!("unknown size: {:?}", size));
            }
        }

        let known_styles: HashSet<String> = store.style_slugs().into_iter().collect();
        let mut styles = BTreeSet::new();
        for style in &raw.styles {
            if known_styles.contains(style) {
                styles.insert(style.clone());
            } else {
                error.add("styles", format!("unknown style: {:?}", style));
            }
        }

        let mut avoid_care = BTreeSet::new();
        for care in &raw.avoid_care {
            match Care::from_slug(care) {
                Some(parsed) => {
                    avoid_care.insert(parsed);
                }
                None => error.add("avoid_care", format!("unknown care type: {:?}", care)),
            }
        }

        let known_formalities: HashSet<String> = store.formality_slugs().into_iter().collect();
        let mut expectations = BTreeMap::new();
        for (formality, frequency) in &raw.expectations {
            if !known_formalities.contains(formality) {
                error.add(
                    "expectations",
                    format!("unknown formality: {:?}", formality),
                );
                continue;
            }
            match Frequency::from_slug(frequency) {
                Some(parsed) => {
                    expectations.insert(formality.clone(), parsed);
                }
                None => error.add(
                    "expectations",
                    format!("unknown frequency {:?} for formality {:?}", frequency, formality),
                ),
            }
        }

        if !error.is_empty() {
            return Err(error);
        }

        Ok(Profile {
            age: raw.age,
            // A missing shape was recorded as a field error above.
            body_shape: body_shape.unwrap(),
            sizes,
            styles,
            avoid_care,
            expectations,
        })
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn body_shape(&self) -> BodyShape {
        self.body_shape
    }

    pub fn sizes(&self) -> &BTreeSet<String> {
        &self.sizes
    }

    pub fn styles(&self) -> &BTreeSet<String> {
        &self.styles
    }

    pub fn avoid_care(&self) -> &BTreeSet<Care> {
        &self.avoid_care
    }

    /// Formality slug to expected frequency of dress.
    pub fn expectations(&self) -> &BTreeMap<String, Frequency> {
        &self.expectations
    }
}
