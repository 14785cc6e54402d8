mod availability;

pub use availability::AvailabilityGarmentFilter;
