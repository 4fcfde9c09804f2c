use crate::models::{PerformancePoint, TradeDirection, TradeEvent};
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Steps excluded from trade sampling at both ends of the series
const TRADE_MARGIN: usize = 2;
/// Uniform draws above this threshold emit a trade event (~15% per step)
const TRADE_THRESHOLD: f64 = 0.85;
/// Floor on the per-step change so the multiplier 1 + change stays positive
const MIN_STEP_CHANGE: f64 = -0.99;

/// Parameters for one synthetic performance series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesParams {
    /// Number of points to produce
    pub length: usize,
    /// Portfolio value the walk starts from
    pub start_value: f64,
    /// Skews the walk up or down; must be in [-1, 1]
    pub drift_bias: f64,
    /// Scales the magnitude of each step; must be positive
    pub step_volatility: f64,
    /// Annotate the interior of the series with sampled buy/sell events
    pub sample_trades: bool,
}

impl Default for SeriesParams {
    /// The backtest-view defaults: 50 days from 10k with a slight
    /// upward skew, trade annotations on.
    fn default() -> Self {
        Self {
            length: 50,
            start_value: 10_000.0,
            drift_bias: -0.45,
            step_volatility: 0.02,
            sample_trades: true,
        }
    }
}

impl SeriesParams {
    fn validate(&self) -> Result<()> {
        if self.length == 0 {
            return Err(Error::InvalidParameters(
                "series length must be positive".to_string(),
            ));
        }
        if !(self.start_value > 0.0) {
            return Err(Error::InvalidParameters(format!(
                "start value must be positive, got {}",
                self.start_value
            )));
        }
        if !(-1.0..=1.0).contains(&self.drift_bias) {
            return Err(Error::InvalidParameters(format!(
                "drift bias must be in [-1, 1], got {}",
                self.drift_bias
            )));
        }
        if !(self.step_volatility > 0.0) {
            return Err(Error::InvalidParameters(format!(
                "step volatility must be positive, got {}",
                self.step_volatility
            )));
        }
        Ok(())
    }
}

/// A generated series plus its sampled trade annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSeries {
    pub points: Vec<PerformancePoint>,
    pub trades: Vec<TradeEvent>,
}

/// Produces synthetic portfolio valuations as a biased multiplicative
/// random walk. The random source is injected via seed so identical
/// seed + params always yield identical output.
pub struct SeriesGenerator {
    rng: StdRng,
}

impl SeriesGenerator {
    /// Create a generator with a seed for reproducibility
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a generator from OS entropy (non-reproducible)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Access the underlying random source, e.g. to reuse the same
    /// seeded stream for sampled metrics.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Generate a performance series.
    ///
    /// Each step draws a uniform sample in [0, 1), shifts it by the
    /// drift bias, scales it by the volatility, and multiplies the
    /// running value by 1 + change. The change is floored so the value
    /// can never reach zero, whatever the volatility.
    ///
    /// Guarantees on success:
    /// - exactly `length` points, labelled "Day 1".."Day {length}"
    /// - all values strictly positive
    /// - every trade event's step lies inside the non-margin interior
    pub fn generate(&mut self, params: &SeriesParams) -> Result<GeneratedSeries> {
        params.validate()?;

        let mut points = Vec::with_capacity(params.length);
        let mut trades = Vec::new();
        let mut value = params.start_value;

        for day in 1..=params.length {
            let sample: f64 = self.rng.gen_range(0.0..1.0);
            let change =
                ((sample + params.drift_bias) * params.step_volatility).max(MIN_STEP_CHANGE);
            value *= 1.0 + change;

            points.push(PerformancePoint {
                label: format!("Day {}", day),
                value,
            });

            let step = day - 1;
            if params.sample_trades && in_trade_window(step, params.length) {
                let trade_sample: f64 = self.rng.gen_range(0.0..1.0);
                if trade_sample > TRADE_THRESHOLD {
                    let direction = if self.rng.gen_bool(0.5) {
                        TradeDirection::Buy
                    } else {
                        TradeDirection::Sell
                    };
                    trades.push(TradeEvent {
                        step,
                        direction,
                        value,
                    });
                }
            }
        }

        tracing::debug!(
            "generated {} points, {} trade events",
            points.len(),
            trades.len()
        );

        Ok(GeneratedSeries { points, trades })
    }
}

fn in_trade_window(step: usize, length: usize) -> bool {
    step >= TRADE_MARGIN && step + TRADE_MARGIN < length
}
