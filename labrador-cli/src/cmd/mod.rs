pub mod normalize;
pub mod query;
pub mod stats;
pub mod topdom;
