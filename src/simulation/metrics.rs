use crate::models::{PerformancePoint, TradeDirection, TradeEvent};
use crate::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Summary statistics for a simulated performance series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestMetrics {
    pub total_return_pct: f64,
    /// 0-100; fraction of completed round trips that were profitable
    pub win_rate: f64,
    pub sharpe_ratio: f64,
    /// Largest peak-to-trough percentage decline, 0-100
    pub max_drawdown_pct: f64,
    /// Gross profit / gross loss across completed round trips
    pub profit_factor: f64,

    // Round-trip bookkeeping (derived mode only; zero in sampled mode)
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
}

impl BacktestMetrics {
    /// Compute metrics from a series and its trade annotations.
    ///
    /// Trade events are paired into round trips: each Buy opens a
    /// position and the next Sell closes it, with P&L taken from the
    /// values at those steps. Win rate and profit factor come from the
    /// round trips; when no round trip completes both default to 0.0.
    pub fn from_series(points: &[PerformancePoint], trades: &[TradeEvent]) -> Result<Self> {
        let (first, last) = Self::endpoints(points)?;

        let total_return_pct = round2((last / first - 1.0) * 100.0);
        let max_drawdown_pct = round2(max_drawdown_pct(points));
        let sharpe_ratio = round2(sharpe_ratio(points));

        let round_trip_pnls = pair_round_trips(trades);
        let total_trades = round_trip_pnls.len();
        let winning_trades = round_trip_pnls.iter().filter(|p| **p > 0.0).count();
        let losing_trades = total_trades - winning_trades;

        let win_rate = if total_trades > 0 {
            round2((winning_trades as f64 / total_trades as f64) * 100.0)
        } else {
            0.0
        };

        let gross_profit: f64 = round_trip_pnls.iter().filter(|p| **p > 0.0).sum();
        let gross_loss: f64 = round_trip_pnls
            .iter()
            .filter(|p| **p <= 0.0)
            .map(|p| p.abs())
            .sum();

        let profit_factor = if gross_loss > 0.0 {
            round2(gross_profit / gross_loss)
        } else if gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        Ok(Self {
            total_return_pct,
            win_rate,
            sharpe_ratio,
            max_drawdown_pct,
            profit_factor,
            total_trades,
            winning_trades,
            losing_trades,
        })
    }

    /// Demo-mode statistics: total return is still derived from the
    /// series endpoints, but every other field is drawn from a fixed
    /// plausible range with no relationship to the series shape. Kept
    /// for dashboard parity with the original mock data; not suitable
    /// for any real claim about performance.
    pub fn sampled<R: Rng>(points: &[PerformancePoint], rng: &mut R) -> Result<Self> {
        let (first, last) = Self::endpoints(points)?;

        Ok(Self {
            total_return_pct: round2((last / first - 1.0) * 100.0),
            win_rate: rng.gen_range(55.0..70.0),
            sharpe_ratio: rng.gen_range(0.8..1.8),
            max_drawdown_pct: rng.gen_range(10.0..35.0),
            profit_factor: rng.gen_range(1.2..2.7),
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
        })
    }

    fn endpoints(points: &[PerformancePoint]) -> Result<(f64, f64)> {
        if points.len() < 2 {
            return Err(Error::InvalidParameters(format!(
                "metrics need at least 2 points, got {}",
                points.len()
            )));
        }
        let first = points[0].value;
        if !(first > 0.0) {
            return Err(Error::InvalidParameters(format!(
                "first series value must be positive, got {}",
                first
            )));
        }
        Ok((first, points[points.len() - 1].value))
    }

    /// Print a formatted report to stdout
    pub fn print_report(&self) {
        println!("\n========== SIMULATED BACKTEST REPORT ==========");
        println!("  Total Return:    {:+.2}%", self.total_return_pct);
        println!("  Win Rate:        {:.2}%", self.win_rate);
        println!("  Sharpe Ratio:    {:.2}", self.sharpe_ratio);
        println!("  Max Drawdown:    {:.2}%", self.max_drawdown_pct);
        println!("  Profit Factor:   {:.2}", self.profit_factor);
        if self.total_trades > 0 {
            println!(
                "  Round Trips:     {} ({} wins / {} losses)",
                self.total_trades, self.winning_trades, self.losing_trades
            );
        }
        println!("===============================================");
    }
}

/// Pair buy/sell events into round-trip P&Ls, in step order.
/// A Buy opens a position; the next Sell closes it. Unmatched events
/// (a Sell with nothing open, a trailing open Buy) are ignored.
fn pair_round_trips(trades: &[TradeEvent]) -> Vec<f64> {
    let mut pnls = Vec::new();
    let mut open_buy: Option<&TradeEvent> = None;

    for trade in trades {
        match trade.direction {
            TradeDirection::Buy => {
                if open_buy.is_none() {
                    open_buy = Some(trade);
                }
            }
            TradeDirection::Sell => {
                if let Some(buy) = open_buy.take() {
                    pnls.push(trade.value - buy.value);
                }
            }
        }
    }

    pnls
}

/// Largest peak-to-trough percentage decline, scanning once with a
/// running peak.
fn max_drawdown_pct(points: &[PerformancePoint]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0;

    for point in points {
        if point.value > peak {
            peak = point.value;
        }
        let dd = (peak - point.value) / peak * 100.0;
        if dd > max_dd {
            max_dd = dd;
        }
    }

    max_dd
}

/// Simplified Sharpe ratio over per-step returns, risk-free rate 0
fn sharpe_ratio(points: &[PerformancePoint]) -> f64 {
    let returns: Vec<f64> = points
        .windows(2)
        .map(|pair| pair[1].value / pair[0].value - 1.0)
        .collect();

    if returns.is_empty() {
        return 0.0;
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns
        .iter()
        .map(|r| {
            let diff = r - mean;
            diff * diff
        })
        .sum::<f64>()
        / returns.len() as f64;
    let std_dev = variance.sqrt();

    if std_dev > 0.0 {
        mean / std_dev
    } else {
        0.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
