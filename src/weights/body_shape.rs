use crate::catalog::{Emphasis, Garment, PantRise};
use crate::catalog_store::CatalogStore;
use crate::pipeline::{ConfigError, DebugSink, PipelineStep, PreparedWeight, Weight};
use crate::profile::{BodyShape, Profile};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Importance levels for matching a body part's ideal emphasis.
const IMPORTANCE_LOW: f64 = 2.0;
const IMPORTANCE_MEDIUM: f64 = 3.0;
const IMPORTANCE_HIGH: f64 = 4.0;

/// The bonus for a pant rise in the shape's ideal set.
const PANT_RISE_BONUS: f64 = IMPORTANCE_LOW;

/// The ideal emphasis for one body part and how much matching it matters.
#[derive(Debug, Clone, Deserialize)]
pub struct PartWeights {
    pub emphasis: Emphasis,
    pub importance: f64,
}

/// The per-shape scoring record: ideal emphases for the three measured body
/// parts plus the pant rises that flatter the shape.
#[derive(Debug, Clone, Deserialize)]
pub struct ShapeWeights {
    pub shoulder: PartWeights,
    pub waist: PartWeights,
    pub hip: PartWeights,
    #[serde(default)]
    pub pant_rises: Vec<PantRise>,
}

/// A complete scoring table, with an entry for every body shape.
#[derive(Debug, Clone)]
pub struct BodyShapeTable {
    apple: ShapeWeights,
    hourglass: ShapeWeights,
    inverted_triangle: ShapeWeights,
    pear: ShapeWeights,
    rectangle: ShapeWeights,
}

impl BodyShapeTable {
    fn for_shape(&self, shape: BodyShape) -> &ShapeWeights {
        match shape {
            BodyShape::Apple => &self.apple,
            BodyShape::Hourglass => &self.hourglass,
            BodyShape::InvertedTriangle => &self.inverted_triangle,
            BodyShape::Pear => &self.pear,
            BodyShape::Rectangle => &self.rectangle,
        }
    }
}

fn part(emphasis: Emphasis, importance: f64) -> PartWeights {
    PartWeights {
        emphasis,
        importance,
    }
}

fn builtin_table() -> BodyShapeTable {
    BodyShapeTable {
        apple: ShapeWeights {
            shoulder: part(Emphasis::Strong, IMPORTANCE_MEDIUM),
            waist: part(Emphasis::Weak, IMPORTANCE_HIGH),
            hip: part(Emphasis::Neutral, IMPORTANCE_MEDIUM),
            pant_rises: vec![PantRise::Low, PantRise::Normal],
        },
        hourglass: ShapeWeights {
            shoulder: part(Emphasis::Neutral, IMPORTANCE_MEDIUM),
            waist: part(Emphasis::Strong, IMPORTANCE_HIGH),
            hip: part(Emphasis::Neutral, IMPORTANCE_MEDIUM),
            pant_rises: vec![PantRise::Normal, PantRise::High],
        },
        inverted_triangle: ShapeWeights {
            shoulder: part(Emphasis::Weak, IMPORTANCE_HIGH),
            waist: part(Emphasis::Neutral, IMPORTANCE_LOW),
            hip: part(Emphasis::Strong, IMPORTANCE_MEDIUM),
            pant_rises: vec![PantRise::Low, PantRise::Normal],
        },
        pear: ShapeWeights {
            shoulder: part(Emphasis::Strong, IMPORTANCE_MEDIUM),
            waist: part(Emphasis::Neutral, IMPORTANCE_LOW),
            hip: part(Emphasis::Weak, IMPORTANCE_HIGH),
            pant_rises: vec![PantRise::Normal, PantRise::High],
        },
        rectangle: ShapeWeights {
            shoulder: part(Emphasis::Neutral, IMPORTANCE_MEDIUM),
            waist: part(Emphasis::Neutral, IMPORTANCE_MEDIUM),
            hip: part(Emphasis::Strong, IMPORTANCE_HIGH),
            pant_rises: vec![PantRise::Low, PantRise::Normal],
        },
    }
}

/// A weight that compares a user's body shape with a garment's cut.
///
/// For each body part, the garment scores by how close its emphasis sits to
/// the shape's ideal emphasis, scaled by how much that part matters for the
/// shape. Garments whose pant rise is in the shape's ideal set receive a
/// flat bonus on top.
#[derive(Debug)]
pub struct BodyShapeWeight {
    table: BodyShapeTable,
}

impl BodyShapeWeight {
    /// Create the weight with the built-in scoring table.
    pub fn new() -> BodyShapeWeight {
        BodyShapeWeight {
            table: builtin_table(),
        }
    }

    /// Create the weight from an injected table keyed by body-shape slug.
    ///
    /// The table must carry a well-formed entry for every shape; unknown
    /// shape keys, missing shapes, and non-positive importances are
    /// configuration errors.
    pub fn from_table(entries: BTreeMap<String, ShapeWeights>) -> Result<BodyShapeWeight, ConfigError> {
        let mut by_shape: BTreeMap<BodyShape, ShapeWeights> = BTreeMap::new();
        for (key, entry) in entries {
            let shape = BodyShape::from_slug(&key)
                .ok_or_else(|| ConfigError::UnknownBodyShape(key.clone()))?;
            for (part_name, part) in [
                ("shoulder", &entry.shoulder),
                ("waist", &entry.waist),
                ("hip", &entry.hip),
            ] {
                if !part.importance.is_finite() || part.importance <= 0.0 {
                    return Err(ConfigError::MalformedShapeEntry {
                        shape: key.clone(),
                        detail: format!(
                            "{} importance must be positive, got {}",
                            part_name, part.importance
                        ),
                    });
                }
            }
            by_shape.insert(shape, entry);
        }

        let mut take = |shape: BodyShape| {
            by_shape
                .remove(&shape)
                .ok_or_else(|| ConfigError::MissingBodyShape(shape.slug().to_string()))
        };

        Ok(BodyShapeWeight {
            table: BodyShapeTable {
                apple: take(BodyShape::Apple)?,
                hourglass: take(BodyShape::Hourglass)?,
                inverted_triangle: take(BodyShape::InvertedTriangle)?,
                pear: take(BodyShape::Pear)?,
                rectangle: take(BodyShape::Rectangle)?,
            },
        })
    }
}

impl Default for BodyShapeWeight {
    fn default() -> BodyShapeWeight {
        BodyShapeWeight::new()
    }
}

impl PipelineStep for BodyShapeWeight {
    fn name(&self) -> &str {
        "Body shape"
    }

    fn slug(&self) -> &str {
        "body-shape"
    }
}

impl Weight for BodyShapeWeight {
    fn prepare(&self, profile: &Profile, _store: &dyn CatalogStore) -> Box<dyn PreparedWeight> {
        let shape = profile.body_shape();
        Box::new(PreparedBodyShapeWeight {
            shape_name: shape.display_name(),
            weights: self.table.for_shape(shape).clone(),
        })
    }
}

struct PreparedBodyShapeWeight {
    shape_name: &'static str,
    weights: ShapeWeights,
}

fn delta_state(delta: u8) -> &'static str {
    match delta {
        0 => "flattering",
        1 => "neutral",
        _ => "unflattering",
    }
}

fn importance_display(importance: f64) -> String {
    if importance == IMPORTANCE_LOW {
        "low".to_string()
    } else if importance == IMPORTANCE_MEDIUM {
        "medium".to_string()
    } else if importance == IMPORTANCE_HIGH {
        "high".to_string()
    } else {
        format!("{}", importance)
    }
}

impl PreparedWeight for PreparedBodyShapeWeight {
    fn score(&self, garment: &Garment, log: &mut dyn DebugSink) -> f64 {
        let mut weight = 0.0;

        let parts = [
            ("shoulder", &self.weights.shoulder, garment.shoulder_emphasis),
            ("waist", &self.weights.waist, garment.waist_emphasis),
            ("hip", &self.weights.hip, garment.hip_emphasis),
        ];
        for (part_name, part, garment_emphasis) in parts {
            let delta = part.emphasis.rank().abs_diff(garment_emphasis.rank());
            let part_weight = part.importance / (delta as f64 + 1.0);
            weight += part_weight;

            if log.enabled() {
                let reason = format!(
                    "A {} {} emphasis is {} for a {} shape and of {} importance",
                    garment_emphasis.display_name(),
                    part_name,
                    delta_state(delta),
                    self.shape_name,
                    importance_display(part.importance)
                );
                log.record(&garment.slug, part_weight, reason);
            }
        }

        if let Some(rise) = garment.pant_rise {
            if self.weights.pant_rises.contains(&rise) {
                weight += PANT_RISE_BONUS;
                if log.enabled() {
                    let reason = format!(
                        "A {} pant rise is flattering for a {} shape",
                        rise.display_name(),
                        self.shape_name
                    );
                    log.record(&garment.slug, PANT_RISE_BONUS, reason);
                }
            } else if log.enabled() {
                let reason = format!(
                    "A {} pant rise is neutral for a {} shape",
                    rise.display_name(),
                    self.shape_name
                );
                log.record(&garment.slug, 0.0, reason);
            }
        }

        weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Brand;
    use crate::pipeline::NoopDebugSink;

    fn garment_with_cut(
        shoulder: Emphasis,
        waist: Emphasis,
        hip: Emphasis,
        pant_rise: Option<PantRise>,
    ) -> Garment {
        Garment {
            slug: "g".to_string(),
            name: "G".to_string(),
            basic: "b".to_string(),
            brand: Brand {
                name: "Brand".to_string(),
                age_lower: None,
                age_upper: None,
            },
            shoulder_emphasis: shoulder,
            waist_emphasis: waist,
            hip_emphasis: hip,
            pant_rise,
            care: None,
            formalities: Default::default(),
            styles: Default::default(),
            is_featured: false,
            stock_records: vec![],
            purchase_options: vec![],
        }
    }

    fn prepared_for(shape: BodyShape) -> PreparedBodyShapeWeight {
        PreparedBodyShapeWeight {
            shape_name: shape.display_name(),
            weights: builtin_table().for_shape(shape).clone(),
        }
    }

    #[test]
    fn ideal_cut_scores_full_importances() {
        // Hourglass ideal: neutral shoulder, strong waist, neutral hip.
        let garment = garment_with_cut(
            Emphasis::Neutral,
            Emphasis::Strong,
            Emphasis::Neutral,
            None,
        );
        let prepared = prepared_for(BodyShape::Hourglass);
        let score = prepared.score(&garment, &mut NoopDebugSink);
        assert_eq!(score, IMPORTANCE_MEDIUM + IMPORTANCE_HIGH + IMPORTANCE_MEDIUM);
    }

    #[test]
    fn distant_emphases_score_less() {
        let ideal = garment_with_cut(
            Emphasis::Neutral,
            Emphasis::Strong,
            Emphasis::Neutral,
            None,
        );
        // Weak waist is two ranks from the hourglass ideal of strong.
        let opposite = garment_with_cut(
            Emphasis::Neutral,
            Emphasis::Weak,
            Emphasis::Neutral,
            None,
        );
        let prepared = prepared_for(BodyShape::Hourglass);
        let ideal_score = prepared.score(&ideal, &mut NoopDebugSink);
        let opposite_score = prepared.score(&opposite, &mut NoopDebugSink);
        assert!(opposite_score < ideal_score);
        let expected_gap = IMPORTANCE_HIGH - IMPORTANCE_HIGH / 3.0;
        assert!((ideal_score - opposite_score - expected_gap).abs() < 1e-9);
    }

    #[test]
    fn matching_pant_rise_earns_the_bonus() {
        let without = garment_with_cut(
            Emphasis::Neutral,
            Emphasis::Neutral,
            Emphasis::Neutral,
            None,
        );
        let matching = garment_with_cut(
            Emphasis::Neutral,
            Emphasis::Neutral,
            Emphasis::Neutral,
            Some(PantRise::High),
        );
        let neutral = garment_with_cut(
            Emphasis::Neutral,
            Emphasis::Neutral,
            Emphasis::Neutral,
            Some(PantRise::Low),
        );
        let prepared = prepared_for(BodyShape::Hourglass);
        let base = prepared.score(&without, &mut NoopDebugSink);
        assert_eq!(
            prepared.score(&matching, &mut NoopDebugSink),
            base + PANT_RISE_BONUS
        );
        assert_eq!(prepared.score(&neutral, &mut NoopDebugSink), base);
    }

    #[test]
    fn records_reasons_for_each_part() {
        let garment = garment_with_cut(
            Emphasis::Weak,
            Emphasis::Strong,
            Emphasis::Neutral,
            Some(PantRise::Normal),
        );
        let prepared = prepared_for(BodyShape::Hourglass);
        let mut log = crate::pipeline::DebugLog::new();
        prepared.score(&garment, &mut log);
        let reasons = log.for_subject("g");
        // Three part explanations plus the pant rise note.
        assert_eq!(reasons.len(), 4);
        assert!(reasons[1].reason.contains("waist"));
        assert!(reasons[1].reason.contains("flattering"));
        assert!(reasons[3].reason.contains("pant rise"));
    }

    fn builtin_entries() -> BTreeMap<String, ShapeWeights> {
        let table = builtin_table();
        BodyShape::ALL
            .iter()
            .map(|shape| (shape.slug().to_string(), table.for_shape(*shape).clone()))
            .collect()
    }

    #[test]
    fn from_table_accepts_a_complete_table() {
        assert!(BodyShapeWeight::from_table(builtin_entries()).is_ok());
    }

    #[test]
    fn from_table_rejects_unknown_shape_keys() {
        let mut entries = builtin_entries();
        let spare = entries["apple"].clone();
        entries.insert("triangle".to_string(), spare);
        assert_eq!(
            BodyShapeWeight::from_table(entries).unwrap_err(),
            ConfigError::UnknownBodyShape("triangle".to_string())
        );
    }

    #[test]
    fn from_table_rejects_missing_shapes() {
        let mut entries = builtin_entries();
        entries.remove("pear");
        assert_eq!(
            BodyShapeWeight::from_table(entries).unwrap_err(),
            ConfigError::MissingBodyShape("pear".to_string())
        );
    }

    #[test]
    fn from_table_rejects_non_positive_importance() {
        let mut entries = builtin_entries();
        entries.get_mut("apple").unwrap().waist.importance = 0.0;
        let error = BodyShapeWeight::from_table(entries).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::MalformedShapeEntry { shape, .. } if shape == "apple"
        ));
    }
}
