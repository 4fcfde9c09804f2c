pub mod generator;
pub mod metrics;
pub mod runner;

pub use generator::{GeneratedSeries, SeriesGenerator, SeriesParams};
pub use metrics::BacktestMetrics;
pub use runner::{BacktestReport, BacktestRunner};
