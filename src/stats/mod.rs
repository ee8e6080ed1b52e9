pub mod aggregate;

pub use aggregate::{OverallStats, SubjectStats, aggregate};
