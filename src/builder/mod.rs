use crate::models::{Strategy, StrategyRules};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Indicator selection for the visual builder. Each variant carries
/// only the parameters that indicator actually uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorRule {
    /// Fast/slow simple moving average crossover
    SmaCross { fast: u32, slow: u32 },
    /// RSI compared against a level
    Rsi { period: u32, level: u32 },
    /// MACD line against its signal line
    MacdCross,
}

impl IndicatorRule {
    fn label(&self) -> &'static str {
        match self {
            IndicatorRule::SmaCross { .. } => "moving average crossover",
            IndicatorRule::Rsi { .. } => "RSI",
            IndicatorRule::MacdCross => "MACD crossover",
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            IndicatorRule::SmaCross { fast, slow } => {
                if fast == 0 || slow == 0 {
                    return Err(Error::InvalidParameters(
                        "SMA periods must be positive".to_string(),
                    ));
                }
                if fast >= slow {
                    return Err(Error::InvalidParameters(format!(
                        "fast SMA period ({}) must be shorter than slow ({})",
                        fast, slow
                    )));
                }
            }
            IndicatorRule::Rsi { period, level } => {
                if period == 0 {
                    return Err(Error::InvalidParameters(
                        "RSI period must be positive".to_string(),
                    ));
                }
                if level > 100 {
                    return Err(Error::InvalidParameters(format!(
                        "RSI level must be 0-100, got {}",
                        level
                    )));
                }
            }
            IndicatorRule::MacdCross => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    CrossesAbove,
    CrossesBelow,
    IsGreaterThan,
    IsLessThan,
}

impl Condition {
    fn phrase(&self) -> &'static str {
        match self {
            Condition::CrossesAbove => "crosses above",
            Condition::CrossesBelow => "crosses below",
            Condition::IsGreaterThan => "is greater than",
            Condition::IsLessThan => "is less than",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    fn phrase(&self) -> &'static str {
        match self {
            TradeAction::Buy => "Enter a buy position",
            TradeAction::Sell => "Enter a sell position",
        }
    }
}

/// The visual strategy-builder form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyForm {
    pub name: String,
    pub indicator: IndicatorRule,
    pub condition: Condition,
    pub action: TradeAction,
}

impl Default for StrategyForm {
    fn default() -> Self {
        Self {
            name: "My Custom Strategy".to_string(),
            indicator: IndicatorRule::SmaCross {
                fast: 50,
                slow: 200,
            },
            condition: Condition::CrossesAbove,
            action: TradeAction::Buy,
        }
    }
}

impl StrategyForm {
    /// Render the entry rule as the sentence shown in the builder
    pub fn rule_text(&self) -> String {
        let action = self.action.phrase();
        let condition = self.condition.phrase();

        match self.indicator {
            IndicatorRule::SmaCross { fast, slow } => format!(
                "{} when the {}-period SMA {} the {}-period SMA.",
                action, fast, condition, slow
            ),
            IndicatorRule::Rsi { period, level } => format!(
                "{} when the {}-period RSI {} {}.",
                action, period, condition, level
            ),
            IndicatorRule::MacdCross => format!(
                "{} when the MACD line {} the signal line.",
                action, condition
            ),
        }
    }

    /// Assemble the free-text Strategy. Exit and stop-loss start as
    /// placeholders for the user to fill in, as in the form flow.
    pub fn build(&self) -> Result<Strategy> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidParameters(
                "strategy name must not be empty".to_string(),
            ));
        }
        self.indicator.validate()?;

        Ok(Strategy {
            name: self.name.clone(),
            description: format!("A strategy based on the {} indicator.", self.indicator.label()),
            rules: StrategyRules {
                entry: self.rule_text(),
                exit: "(Define exit condition)".to_string(),
                stop_loss: Some("(Define stop-loss)".to_string()),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_form_builds_sma_rule() {
        let form = StrategyForm::default();

        assert_eq!(
            form.rule_text(),
            "Enter a buy position when the 50-period SMA crosses above the 200-period SMA."
        );

        let strategy = form.build().unwrap();
        assert_eq!(strategy.name, "My Custom Strategy");
        assert!(strategy.description.contains("moving average crossover"));
        assert_eq!(strategy.rules.exit, "(Define exit condition)");
    }

    #[test]
    fn test_rsi_rule_text() {
        let form = StrategyForm {
            indicator: IndicatorRule::Rsi {
                period: 14,
                level: 30,
            },
            condition: Condition::IsLessThan,
            ..StrategyForm::default()
        };

        assert_eq!(
            form.rule_text(),
            "Enter a buy position when the 14-period RSI is less than 30."
        );
    }

    #[test]
    fn test_macd_sell_rule_text() {
        let form = StrategyForm {
            indicator: IndicatorRule::MacdCross,
            condition: Condition::CrossesBelow,
            action: TradeAction::Sell,
            ..StrategyForm::default()
        };

        assert_eq!(
            form.rule_text(),
            "Enter a sell position when the MACD line crosses below the signal line."
        );
    }

    #[test]
    fn test_invalid_sma_periods_rejected() {
        let inverted = StrategyForm {
            indicator: IndicatorRule::SmaCross {
                fast: 200,
                slow: 50,
            },
            ..StrategyForm::default()
        };
        assert!(matches!(
            inverted.build(),
            Err(Error::InvalidParameters(_))
        ));

        let zero = StrategyForm {
            indicator: IndicatorRule::SmaCross { fast: 0, slow: 200 },
            ..StrategyForm::default()
        };
        assert!(zero.build().is_err());
    }

    #[test]
    fn test_invalid_rsi_level_rejected() {
        let form = StrategyForm {
            indicator: IndicatorRule::Rsi {
                period: 14,
                level: 150,
            },
            ..StrategyForm::default()
        };

        assert!(form.build().is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        let form = StrategyForm {
            name: "   ".to_string(),
            ..StrategyForm::default()
        };

        assert!(form.build().is_err());
    }
}
