mod price;

pub use price::{PriceFacet, GROUP_HIGH, GROUP_LOW, GROUP_MEDIUM, PRICE_GROUP_ORDER};
