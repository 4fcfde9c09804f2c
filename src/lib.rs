// Core modules
pub mod assistant;
pub mod builder;
pub mod config;
pub mod models;
pub mod risk;
pub mod session;
pub mod simulation;

mod error;

// Re-export commonly used types
pub use error::Error;
pub use models::*;

pub type Result<T> = std::result::Result<T, Error>;
