// Domain layer - Pure data types and transformations
pub mod chart;
pub mod filter;
pub mod record;
pub mod summary;
