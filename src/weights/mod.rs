mod age;
mod body_shape;
mod care;
mod featured;
mod formality;
mod style;

pub use age::{AgeWeight, DEFAULT_TAIL_YEARS};
pub use body_shape::{BodyShapeWeight, PartWeights, ShapeWeights};
pub use care::CareWeight;
pub use featured::FeaturedWeight;
pub use formality::FormalityWeight;
pub use style::StyleWeight;
