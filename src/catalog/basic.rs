use serde::{Deserialize, Serialize};

/// How appropriate a basic is at a given level of formality.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProprietyImportance {
    Not,
    Mildly,
    Somewhat,
    Very,
    Always,
}

impl ProprietyImportance {
    pub const ALL: [ProprietyImportance; 5] = [
        ProprietyImportance::Not,
        ProprietyImportance::Mildly,
        ProprietyImportance::Somewhat,
        ProprietyImportance::Very,
        ProprietyImportance::Always,
    ];

    /// Linear 0..1 weight by rank, so the weakest level carries no weight and
    /// the strongest carries full weight.
    pub fn weight(&self) -> f64 {
        let rank = match self {
            ProprietyImportance::Not => 0,
            ProprietyImportance::Mildly => 1,
            ProprietyImportance::Somewhat => 2,
            ProprietyImportance::Very => 3,
            ProprietyImportance::Always => 4,
        };
        rank as f64 / (Self::ALL.len() - 1) as f64
    }
}

/// An association between a basic and a formality level, describing how
/// appropriate the basic is at that level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Propriety {
    pub formality: String,
    pub importance: ProprietyImportance,
}

/// A garment role, such as "blazer". Carries the price points used by the
/// price facet and the formality-appropriateness data used by the formality
/// query filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Basic {
    pub slug: String,
    pub name: String,
    pub budget_end_cents: u32,
    pub luxury_start_cents: u32,
    #[serde(default)]
    pub proprieties: Vec<Propriety>,
}

/// A level of formality of dress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formality {
    pub slug: String,
    pub name: String,
}

/// A style a garment or a user can favor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub slug: String,
    pub name: String,
}

/// A standard clothing size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardSize {
    pub slug: String,
}
