pub mod gemini;
pub mod inflight;

pub use gemini::StrategyAssistant;
pub use inflight::{InFlight, RequestToken};
