mod formality;

pub use formality::FormalityQueryFilter;
