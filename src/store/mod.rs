pub mod json_store;
pub mod schema;
pub mod stats;

pub use stats::StatsStore;
