pub mod client;
pub mod prompt;
pub mod wire;

pub use client::{GenClient, GenError};
