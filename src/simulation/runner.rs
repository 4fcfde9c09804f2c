use crate::models::Strategy;
use crate::risk::RiskLevel;
use crate::simulation::generator::{GeneratedSeries, SeriesGenerator, SeriesParams};
use crate::simulation::metrics::BacktestMetrics;
use crate::Result;
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Duration};

/// Simulated "historical backtest" latency, matching the original UI feel
const DEFAULT_LATENCY_MS: u64 = 1500;

/// Outcome of one simulated backtest run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub strategy_name: String,
    pub metrics: BacktestMetrics,
    pub series: GeneratedSeries,
}

impl BacktestReport {
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_drawdown(self.metrics.max_drawdown_pct)
    }

    /// Print a formatted report to stdout
    pub fn print_report(&self) {
        println!("\nBacktest Report: {}", self.strategy_name);
        println!(
            "  Series: {} points, {} trade events",
            self.series.points.len(),
            self.series.trades.len()
        );
        self.metrics.print_report();
        println!("  Risk: {}", self.risk_level());
    }
}

/// Drives the series generator and the metrics aggregator behind a
/// timer that stands in for network latency. There is no market data
/// and no execution engine anywhere behind this; the numbers exist to
/// exercise the dashboard.
pub struct BacktestRunner {
    generator: SeriesGenerator,
    params: SeriesParams,
    latency: Duration,
    sampled_metrics: bool,
}

impl BacktestRunner {
    /// Create a runner with a seeded random source and the default
    /// backtest-view parameters.
    pub fn new(seed: u64) -> Self {
        Self {
            generator: SeriesGenerator::new(seed),
            params: SeriesParams::default(),
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
            sampled_metrics: false,
        }
    }

    pub fn with_params(mut self, params: SeriesParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Switch the aggregator to the demo-mode sampled statistics
    pub fn with_sampled_metrics(mut self, sampled: bool) -> Self {
        self.sampled_metrics = sampled;
        self
    }

    /// Run one simulated backtest for a strategy.
    ///
    /// Suspends only on the latency timer; generation and aggregation
    /// are synchronous and pure.
    pub async fn run(&mut self, strategy: &Strategy) -> Result<BacktestReport> {
        tracing::info!(
            "Running simulated backtest for '{}' ({} steps)",
            strategy.name,
            self.params.length
        );

        sleep(self.latency).await;

        let series = self.generator.generate(&self.params)?;
        let metrics = if self.sampled_metrics {
            BacktestMetrics::sampled(&series.points, self.generator.rng_mut())?
        } else {
            BacktestMetrics::from_series(&series.points, &series.trades)?
        };

        tracing::info!(
            "Backtest complete: {:+.2}% return, {:.2}% max drawdown",
            metrics.total_return_pct,
            metrics.max_drawdown_pct
        );

        Ok(BacktestReport {
            strategy_name: strategy.name.clone(),
            metrics,
            series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StrategyRules;

    fn demo_strategy() -> Strategy {
        Strategy {
            name: "Golden Cross".to_string(),
            description: "Trend following on moving-average crossovers".to_string(),
            rules: StrategyRules {
                entry: "Buy when the 50-day SMA crosses above the 200-day SMA".to_string(),
                exit: "Sell on the opposite crossover".to_string(),
                stop_loss: None,
            },
        }
    }

    fn quick_runner(seed: u64) -> BacktestRunner {
        BacktestRunner::new(seed).with_latency(Duration::from_millis(0))
    }

    #[tokio::test]
    async fn test_run_produces_consistent_report() {
        let report = quick_runner(42).run(&demo_strategy()).await.unwrap();

        assert_eq!(report.strategy_name, "Golden Cross");
        assert_eq!(report.series.points.len(), 50);

        // Derived mode: return sign must agree with the series endpoints
        let first = report.series.points.first().unwrap().value;
        let last = report.series.points.last().unwrap().value;
        assert_eq!(report.metrics.total_return_pct > 0.0, last > first);
    }

    #[tokio::test]
    async fn test_same_seed_same_report() {
        let a = quick_runner(99).run(&demo_strategy()).await.unwrap();
        let b = quick_runner(99).run(&demo_strategy()).await.unwrap();

        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_sampled_mode_keeps_derived_return() {
        let mut runner = quick_runner(42).with_sampled_metrics(true);
        let report = runner.run(&demo_strategy()).await.unwrap();

        let first = report.series.points.first().unwrap().value;
        let last = report.series.points.last().unwrap().value;
        let expected = ((last / first - 1.0) * 10_000.0).round() / 100.0;
        assert!((report.metrics.total_return_pct - expected).abs() < 1e-9);
        assert!((55.0..70.0).contains(&report.metrics.win_rate));
    }

    #[tokio::test]
    async fn test_invalid_params_propagate() {
        let mut runner = quick_runner(1).with_params(SeriesParams {
            length: 0,
            ..SeriesParams::default()
        });

        assert!(runner.run(&demo_strategy()).await.is_err());
    }
}
