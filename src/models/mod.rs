use crate::risk::RiskLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One step on a portfolio performance chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformancePoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDirection {
    Buy,
    Sell,
}

/// Sparse trade annotation attached to a specific series step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    /// Zero-based index into the performance series
    pub step: usize,
    pub direction: TradeDirection,
    /// Portfolio value at the annotated step
    pub value: f64,
}

/// A trading strategy as free text, either assembled by the visual
/// builder or parsed from the AI assistant's structured output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    pub description: String,
    pub rules: StrategyRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyRules {
    pub entry: String,
    pub exit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<String>,
}

/// A paper-trading strategy container. Each container exclusively owns
/// its performance series; nothing is shared between containers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperStrategy {
    pub id: Uuid,
    pub name: String,
    pub pnl: f64,
    pub win_rate: f64,
    pub trades: u32,
    pub is_active: bool,
    pub performance: Vec<PerformancePoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrokerStatus {
    Connected,
    Disconnected,
}

/// A strategy deployed to (simulated) live trading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveStrategy {
    pub id: Uuid,
    pub name: String,
    pub pnl: f64,
    pub win_rate: f64,
    pub trades: u32,
    pub is_active: bool,
    pub broker_status: BrokerStatus,
    pub deployed_at: DateTime<Utc>,
    pub performance: Vec<PerformancePoint>,
}

/// Catalog entry for the community strategy marketplace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceStrategy {
    pub name: String,
    pub author: String,
    pub description: String,
    pub return_ytd: f64,
    pub risk: RiskLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_rules_serde_uses_camel_case() {
        let rules = StrategyRules {
            entry: "Buy on golden cross".to_string(),
            exit: "Sell on death cross".to_string(),
            stop_loss: Some("8% below entry".to_string()),
        };

        let json = serde_json::to_string(&rules).unwrap();
        assert!(json.contains("\"stopLoss\""));

        let parsed: StrategyRules = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, rules);
    }

    #[test]
    fn test_strategy_rules_stop_loss_is_optional() {
        let parsed: StrategyRules =
            serde_json::from_str(r#"{"entry":"buy low","exit":"sell high"}"#).unwrap();

        assert_eq!(parsed.stop_loss, None);

        let json = serde_json::to_string(&parsed).unwrap();
        assert!(!json.contains("stopLoss"));
    }

    #[test]
    fn test_paper_strategy_creation() {
        let strategy = PaperStrategy {
            id: Uuid::new_v4(),
            name: "My Golden Cross".to_string(),
            pnl: 1250.78,
            win_rate: 68.0,
            trades: 42,
            is_active: true,
            performance: vec![PerformancePoint {
                label: "Day 1".to_string(),
                value: 10_000.0,
            }],
        };

        assert!(strategy.is_active);
        assert_eq!(strategy.performance.len(), 1);
    }
}
