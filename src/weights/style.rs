use crate::catalog::Garment;
use crate::catalog_store::CatalogStore;
use crate::pipeline::{DebugSink, PipelineStep, PreparedWeight, Weight};
use crate::profile::Profile;
use std::collections::{BTreeMap, BTreeSet};

/// The weight added for each matching style.
const MATCH_WEIGHT: f64 = 1.0;

/// A weight that gives preference to garments matching a user's styles: one
/// match weight per style shared between the profile and the garment.
pub struct StyleWeight;

impl StyleWeight {
    pub fn new() -> StyleWeight {
        StyleWeight
    }
}

impl Default for StyleWeight {
    fn default() -> StyleWeight {
        StyleWeight::new()
    }
}

impl PipelineStep for StyleWeight {
    fn name(&self) -> &str {
        "Style"
    }

    fn slug(&self) -> &str {
        "style"
    }
}

impl Weight for StyleWeight {
    fn prepare(&self, profile: &Profile, store: &dyn CatalogStore) -> Box<dyn PreparedWeight> {
        Box::new(PreparedStyleWeight {
            profile_styles: profile.styles().clone(),
            style_names: store.style_names(),
        })
    }
}

struct PreparedStyleWeight {
    profile_styles: BTreeSet<String>,
    style_names: BTreeMap<String, String>,
}

impl PreparedWeight for PreparedStyleWeight {
    fn score(&self, garment: &Garment, log: &mut dyn DebugSink) -> f64 {
        let matching: Vec<&String> = self
            .profile_styles
            .intersection(&garment.styles)
            .collect();

        if log.enabled() {
            for style in &matching {
                let name = self
                    .style_names
                    .get(*style)
                    .map(|n| n.to_lowercase())
                    .unwrap_or_else(|| (*style).clone());
                let reason = format!("The garment matches the user style of {}", name);
                log.record(&garment.slug, MATCH_WEIGHT, reason);
            }
        }

        matching.len() as f64 * MATCH_WEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Brand, Emphasis};
    use crate::pipeline::{DebugLog, NoopDebugSink};

    fn garment_with_styles(styles: &[&str]) -> Garment {
        Garment {
            slug: "g".to_string(),
            name: "G".to_string(),
            basic: "b".to_string(),
            brand: Brand {
                name: "Brand".to_string(),
                age_lower: None,
                age_upper: None,
            },
            shoulder_emphasis: Emphasis::Neutral,
            waist_emphasis: Emphasis::Neutral,
            hip_emphasis: Emphasis::Neutral,
            pant_rise: None,
            care: None,
            formalities: Default::default(),
            styles: styles.iter().map(|s| s.to_string()).collect(),
            is_featured: false,
            stock_records: vec![],
            purchase_options: vec![],
        }
    }

    fn prepared_with_styles(styles: &[&str]) -> PreparedStyleWeight {
        PreparedStyleWeight {
            profile_styles: styles.iter().map(|s| s.to_string()).collect(),
            style_names: [
                ("classic".to_string(), "Classic".to_string()),
                ("bold".to_string(), "Bold".to_string()),
            ]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn scores_one_weight_per_matching_style() {
        let prepared = prepared_with_styles(&["classic", "bold"]);

        let both = garment_with_styles(&["classic", "bold", "sleek"]);
        assert_eq!(prepared.score(&both, &mut NoopDebugSink), 2.0);

        let one = garment_with_styles(&["bold"]);
        assert_eq!(prepared.score(&one, &mut NoopDebugSink), 1.0);
    }

    #[test]
    fn more_matches_rank_higher_than_fewer() {
        let prepared = prepared_with_styles(&["classic", "bold"]);
        let full = garment_with_styles(&["classic", "bold"]);
        let partial = garment_with_styles(&["classic"]);
        let none = garment_with_styles(&["sleek"]);

        let full_score = prepared.score(&full, &mut NoopDebugSink);
        let partial_score = prepared.score(&partial, &mut NoopDebugSink);
        let none_score = prepared.score(&none, &mut NoopDebugSink);
        assert!(full_score > partial_score);
        assert!(partial_score > none_score);
        assert_eq!(none_score, 0.0);
    }

    #[test]
    fn explains_each_match_by_name() {
        let prepared = prepared_with_styles(&["classic", "bold"]);
        let garment = garment_with_styles(&["classic", "bold"]);
        let mut log = DebugLog::new();
        prepared.score(&garment, &mut log);

        let reasons = log.for_subject("g");
        assert_eq!(reasons.len(), 2);
        assert!(reasons[0].reason.contains("bold"));
        assert!(reasons[1].reason.contains("classic"));
    }
}
