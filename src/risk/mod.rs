use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk bucket derived from maximum drawdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify a max-drawdown percentage.
    ///
    /// Thresholds: <= 15 is Low, (15, 30] is Medium, > 30 is High.
    /// Total over f64; callers are expected to pass values in [0, 100].
    pub fn from_drawdown(max_drawdown_pct: f64) -> Self {
        if max_drawdown_pct <= 15.0 {
            RiskLevel::Low
        } else if max_drawdown_pct <= 30.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low Risk"),
            RiskLevel::Medium => write!(f, "Medium Risk"),
            RiskLevel::High => write!(f, "High Risk"),
        }
    }
}
