use crate::catalog::Garment;
use crate::catalog_store::CatalogStore;
use crate::pipeline::{DebugSink, PipelineStep, PreparedWeight, Weight};
use crate::profile::Profile;

/// The full weight for an age inside a brand's target range.
const AGE_WEIGHT: f64 = 1.0;

/// Default values for missing brand age ranges.
const AGE_RANGE_MIN: u8 = 0;
const AGE_RANGE_MAX: u8 = 100;

/// Default number of tail years outside a brand's range that still score.
pub const DEFAULT_TAIL_YEARS: u8 = 3;

/// A weight that compares a user's age with a brand's target age range.
///
/// Ages inside the range receive the full weight. Outside it the weight
/// decays linearly, reaching zero one year past `tail_years` from the
/// nearest range edge.
pub struct AgeWeight {
    tail_years: u8,
}

impl AgeWeight {
    pub fn new(tail_years: u8) -> AgeWeight {
        AgeWeight { tail_years }
    }
}

impl Default for AgeWeight {
    fn default() -> AgeWeight {
        AgeWeight::new(DEFAULT_TAIL_YEARS)
    }
}

impl PipelineStep for AgeWeight {
    fn name(&self) -> &str {
        "Age"
    }

    fn slug(&self) -> &str {
        "age"
    }
}

impl Weight for AgeWeight {
    fn prepare(&self, profile: &Profile, _store: &dyn CatalogStore) -> Box<dyn PreparedWeight> {
        Box::new(PreparedAgeWeight {
            age: profile.age(),
            tail_years: self.tail_years,
        })
    }
}

struct PreparedAgeWeight {
    age: u8,
    tail_years: u8,
}

impl PreparedWeight for PreparedAgeWeight {
    fn score(&self, garment: &Garment, log: &mut dyn DebugSink) -> f64 {
        let lower = garment.brand.age_lower.unwrap_or(AGE_RANGE_MIN);
        let upper = garment.brand.age_upper.unwrap_or(AGE_RANGE_MAX);
        let age = self.age;

        let is_in_range = lower <= age && age <= upper;
        let weight = if is_in_range {
            AGE_WEIGHT
        } else {
            let distance = if age < lower { lower - age } else { age - upper };
            if distance <= self.tail_years {
                let span = self.tail_years as f64 + 1.0;
                AGE_WEIGHT * (span - distance as f64) / span
            } else {
                0.0
            }
        };

        if log.enabled() && weight > 0.0 {
            let brand_range = format!(
                "{}'s age range of {}-{}",
                garment.brand.name, lower, upper
            );
            let reason = if is_in_range {
                format!("{} includes {}", brand_range, age)
            } else {
                format!(
                    "{} is within {} years of {}",
                    brand_range, self.tail_years, age
                )
            };
            log.record(&garment.slug, weight, reason);
        }

        weight
    }
}
