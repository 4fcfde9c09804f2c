use crate::models::{
    BrokerStatus, LiveStrategy, MarketplaceStrategy, PaperStrategy, PerformancePoint, Strategy,
};
use crate::risk::RiskLevel;
use crate::simulation::generator::{SeriesGenerator, SeriesParams};
use crate::simulation::runner::BacktestReport;
use crate::{Error, Result};
use chrono::Utc;
use std::collections::BTreeSet;
use uuid::Uuid;

/// The screens of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Builder,
    Backtest,
    PaperTrading,
    LiveTrading,
    Learn,
    Marketplace,
}

/// Named session transitions. Every mutation of session state goes
/// through `Session::apply`, which keeps the transitions auditable.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    LogIn,
    LogOut,
    Navigate(View),
    /// Select a strategy and jump to the backtest view; clears any
    /// previous backtest report
    SelectStrategy(Strategy),
    ClearStrategy,
    /// Store a finished backtest report for the active strategy
    RecordBacktest(BacktestReport),
    ToggleFollow(String),
    TogglePaper(Uuid),
    ToggleLive(Uuid),
    /// Promote the active, backtested strategy to live trading
    DeployLive,
}

/// Value a freshly deployed live strategy starts from
const LIVE_START_VALUE: f64 = 25_000.0;
const DEFAULT_FOLLOWED: &str = "Steady Dividend Grower";

/// Single source of truth for the dashboard's session state
#[derive(Debug)]
pub struct Session {
    authenticated: bool,
    view: View,
    active_strategy: Option<Strategy>,
    last_backtest: Option<BacktestReport>,
    followed: BTreeSet<String>,
    paper: Vec<PaperStrategy>,
    live: Vec<LiveStrategy>,
}

/// Aggregates shown on the dashboard landing view
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total_pnl: f64,
    pub total_trades: u32,
    pub active_strategies: usize,
    pub paper_strategies: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let mut followed = BTreeSet::new();
        followed.insert(DEFAULT_FOLLOWED.to_string());

        Self {
            authenticated: false,
            view: View::Dashboard,
            active_strategy: None,
            last_backtest: None,
            followed,
            paper: Vec::new(),
            live: Vec::new(),
        }
    }

    /// A session pre-seeded with the demo paper-trading strategies
    pub fn with_demo_data(generator: &mut SeriesGenerator) -> Result<Self> {
        let mut session = Self::new();
        session.paper = demo_paper_strategies(generator)?;
        Ok(session)
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn active_strategy(&self) -> Option<&Strategy> {
        self.active_strategy.as_ref()
    }

    pub fn last_backtest(&self) -> Option<&BacktestReport> {
        self.last_backtest.as_ref()
    }

    pub fn followed(&self) -> &BTreeSet<String> {
        &self.followed
    }

    pub fn paper_strategies(&self) -> &[PaperStrategy] {
        &self.paper
    }

    pub fn live_strategies(&self) -> &[LiveStrategy] {
        &self.live
    }

    pub fn dashboard_summary(&self) -> DashboardSummary {
        DashboardSummary {
            total_pnl: self.paper.iter().map(|s| s.pnl).sum(),
            total_trades: self.paper.iter().map(|s| s.trades).sum(),
            active_strategies: self.paper.iter().filter(|s| s.is_active).count(),
            paper_strategies: self.paper.len(),
        }
    }

    /// Apply one transition. Events other than LogIn are rejected
    /// while unauthenticated.
    pub fn apply(&mut self, event: SessionEvent) -> Result<()> {
        if !self.authenticated && !matches!(event, SessionEvent::LogIn) {
            return Err(Error::InvalidParameters(
                "session is not authenticated".to_string(),
            ));
        }

        match event {
            SessionEvent::LogIn => {
                self.authenticated = true;
            }
            SessionEvent::LogOut => {
                self.authenticated = false;
                self.view = View::Dashboard;
                self.active_strategy = None;
                self.last_backtest = None;
            }
            SessionEvent::Navigate(view) => {
                self.view = view;
            }
            SessionEvent::SelectStrategy(strategy) => {
                tracing::info!("Selected strategy '{}'", strategy.name);
                self.active_strategy = Some(strategy);
                self.last_backtest = None;
                self.view = View::Backtest;
            }
            SessionEvent::ClearStrategy => {
                self.active_strategy = None;
                self.last_backtest = None;
            }
            SessionEvent::RecordBacktest(report) => {
                let active = self.active_strategy.as_ref().ok_or_else(|| {
                    Error::InvalidParameters(
                        "no active strategy to record a backtest for".to_string(),
                    )
                })?;
                if report.strategy_name != active.name {
                    return Err(Error::InvalidParameters(format!(
                        "backtest report is for '{}', active strategy is '{}'",
                        report.strategy_name, active.name
                    )));
                }
                self.last_backtest = Some(report);
            }
            SessionEvent::ToggleFollow(name) => {
                if !self.followed.remove(&name) {
                    self.followed.insert(name);
                }
            }
            SessionEvent::TogglePaper(id) => {
                let strategy = self
                    .paper
                    .iter_mut()
                    .find(|s| s.id == id)
                    .ok_or_else(|| {
                        Error::InvalidParameters(format!("unknown paper strategy id {}", id))
                    })?;
                strategy.is_active = !strategy.is_active;
            }
            SessionEvent::ToggleLive(id) => {
                let strategy = self
                    .live
                    .iter_mut()
                    .find(|s| s.id == id)
                    .ok_or_else(|| {
                        Error::InvalidParameters(format!("unknown live strategy id {}", id))
                    })?;
                strategy.is_active = !strategy.is_active;
            }
            SessionEvent::DeployLive => {
                let strategy = self.active_strategy.as_ref().ok_or_else(|| {
                    Error::InvalidParameters("no active strategy to deploy".to_string())
                })?;
                if self.last_backtest.is_none() {
                    return Err(Error::InvalidParameters(
                        "deploying live requires a completed backtest".to_string(),
                    ));
                }

                tracing::info!("Deploying '{}' to live trading", strategy.name);
                self.live.push(LiveStrategy {
                    id: Uuid::new_v4(),
                    name: strategy.name.clone(),
                    pnl: 0.0,
                    win_rate: 0.0,
                    trades: 0,
                    is_active: true,
                    broker_status: BrokerStatus::Connected,
                    deployed_at: Utc::now(),
                    performance: vec![PerformancePoint {
                        label: "Start".to_string(),
                        value: LIVE_START_VALUE,
                    }],
                });
                self.view = View::LiveTrading;
            }
        }

        Ok(())
    }
}

/// The community marketplace catalog shown to every user
pub fn marketplace_catalog() -> Vec<MarketplaceStrategy> {
    let entries = [
        (
            "Momentum Master",
            "CryptoKing",
            "A high-frequency strategy for volatile tech stocks.",
            45.2,
            RiskLevel::High,
        ),
        (
            "Steady Dividend Grower",
            "ValueInvest",
            "Focuses on stable, dividend-paying blue-chip stocks.",
            12.8,
            RiskLevel::Low,
        ),
        (
            "ETF Rotator",
            "SectorSurfer",
            "Rotates between major sector ETFs based on relative strength.",
            22.5,
            RiskLevel::Medium,
        ),
        (
            "Mean Reversion",
            "TraderJane",
            "A classic strategy that profits from short-term price corrections.",
            18.9,
            RiskLevel::Medium,
        ),
        (
            "Gold Cross Standard",
            "ChartWizard",
            "A trend-following strategy using 50/200 day moving averages.",
            15.3,
            RiskLevel::Low,
        ),
        (
            "AI Trend Predictor",
            "QuantAI",
            "Uses a proprietary machine learning model to predict market direction.",
            78.1,
            RiskLevel::High,
        ),
    ];

    entries
        .iter()
        .map(|(name, author, description, return_ytd, risk)| MarketplaceStrategy {
            name: name.to_string(),
            author: author.to_string(),
            description: description.to_string(),
            return_ytd: *return_ytd,
            risk: *risk,
        })
        .collect()
}

fn demo_paper_strategies(generator: &mut SeriesGenerator) -> Result<Vec<PaperStrategy>> {
    // (name, start value, drift, volatility, pnl, win rate, trades, active)
    let seeds: [(&str, f64, f64, f64, f64, f64, u32, bool); 3] = [
        ("My Golden Cross", 10_000.0, -0.40, 0.010, 1250.78, 68.0, 42, true),
        ("RSI Momentum", 5_000.0, -0.55, 0.020, -340.50, 45.0, 78, true),
        ("ETF Sector Rotator", 7_500.0, -0.45, 0.015, 880.00, 61.0, 25, false),
    ];

    seeds
        .iter()
        .map(
            |(name, start_value, drift_bias, step_volatility, pnl, win_rate, trades, is_active)| {
                let series = generator.generate(&SeriesParams {
                    length: 30,
                    start_value: *start_value,
                    drift_bias: *drift_bias,
                    step_volatility: *step_volatility,
                    sample_trades: false,
                })?;

                Ok(PaperStrategy {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    pnl: *pnl,
                    win_rate: *win_rate,
                    trades: *trades,
                    is_active: *is_active,
                    performance: series.points,
                })
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StrategyRules;
    use crate::simulation::metrics::BacktestMetrics;
    use crate::simulation::GeneratedSeries;

    fn strategy(name: &str) -> Strategy {
        Strategy {
            name: name.to_string(),
            description: "test".to_string(),
            rules: StrategyRules {
                entry: "buy".to_string(),
                exit: "sell".to_string(),
                stop_loss: None,
            },
        }
    }

    fn report_for(name: &str) -> BacktestReport {
        let points = vec![
            PerformancePoint {
                label: "Day 1".to_string(),
                value: 10_000.0,
            },
            PerformancePoint {
                label: "Day 2".to_string(),
                value: 11_000.0,
            },
        ];
        BacktestReport {
            strategy_name: name.to_string(),
            metrics: BacktestMetrics::from_series(&points, &[]).unwrap(),
            series: GeneratedSeries {
                points,
                trades: vec![],
            },
        }
    }

    fn logged_in() -> Session {
        let mut session = Session::new();
        session.apply(SessionEvent::LogIn).unwrap();
        session
    }

    #[test]
    fn test_events_rejected_while_unauthenticated() {
        let mut session = Session::new();

        let err = session.apply(SessionEvent::Navigate(View::Learn)).unwrap_err();
        assert!(matches!(err, Error::InvalidParameters(_)));

        session.apply(SessionEvent::LogIn).unwrap();
        session.apply(SessionEvent::Navigate(View::Learn)).unwrap();
        assert_eq!(session.view(), View::Learn);
    }

    #[test]
    fn test_select_strategy_navigates_and_clears_report() {
        let mut session = logged_in();

        session
            .apply(SessionEvent::SelectStrategy(strategy("First")))
            .unwrap();
        session
            .apply(SessionEvent::RecordBacktest(report_for("First")))
            .unwrap();
        assert!(session.last_backtest().is_some());

        session
            .apply(SessionEvent::SelectStrategy(strategy("Second")))
            .unwrap();
        assert_eq!(session.view(), View::Backtest);
        assert!(session.last_backtest().is_none());
        assert_eq!(session.active_strategy().unwrap().name, "Second");
    }

    #[test]
    fn test_record_backtest_requires_matching_strategy() {
        let mut session = logged_in();

        // No active strategy at all
        assert!(session
            .apply(SessionEvent::RecordBacktest(report_for("Ghost")))
            .is_err());

        session
            .apply(SessionEvent::SelectStrategy(strategy("Mine")))
            .unwrap();
        assert!(session
            .apply(SessionEvent::RecordBacktest(report_for("Other")))
            .is_err());
        session
            .apply(SessionEvent::RecordBacktest(report_for("Mine")))
            .unwrap();
    }

    #[test]
    fn test_deploy_live_requires_backtest() {
        let mut session = logged_in();
        session
            .apply(SessionEvent::SelectStrategy(strategy("Mine")))
            .unwrap();

        assert!(session.apply(SessionEvent::DeployLive).is_err());

        session
            .apply(SessionEvent::RecordBacktest(report_for("Mine")))
            .unwrap();
        session.apply(SessionEvent::DeployLive).unwrap();

        assert_eq!(session.view(), View::LiveTrading);
        let live = &session.live_strategies()[0];
        assert_eq!(live.name, "Mine");
        assert_eq!(live.pnl, 0.0);
        assert_eq!(live.broker_status, BrokerStatus::Connected);
        assert_eq!(live.performance.len(), 1);
        assert_eq!(live.performance[0].value, 25_000.0);
    }

    #[test]
    fn test_logout_resets_view_and_strategy() {
        let mut session = logged_in();
        session
            .apply(SessionEvent::SelectStrategy(strategy("Mine")))
            .unwrap();

        session.apply(SessionEvent::LogOut).unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(session.view(), View::Dashboard);
        assert!(session.active_strategy().is_none());
        assert!(session.last_backtest().is_none());
    }

    #[test]
    fn test_toggle_follow_roundtrip() {
        let mut session = logged_in();
        assert!(session.followed().contains(DEFAULT_FOLLOWED));

        session
            .apply(SessionEvent::ToggleFollow(DEFAULT_FOLLOWED.to_string()))
            .unwrap();
        assert!(!session.followed().contains(DEFAULT_FOLLOWED));

        session
            .apply(SessionEvent::ToggleFollow(DEFAULT_FOLLOWED.to_string()))
            .unwrap();
        assert!(session.followed().contains(DEFAULT_FOLLOWED));
    }

    #[test]
    fn test_toggle_unknown_container_is_an_error() {
        let mut session = logged_in();

        assert!(session
            .apply(SessionEvent::TogglePaper(Uuid::new_v4()))
            .is_err());
        assert!(session
            .apply(SessionEvent::ToggleLive(Uuid::new_v4()))
            .is_err());
    }

    #[test]
    fn test_demo_data_seeds_three_paper_strategies() {
        let mut generator = SeriesGenerator::new(42);
        let session = Session::with_demo_data(&mut generator).unwrap();

        let paper = session.paper_strategies();
        assert_eq!(paper.len(), 3);
        for strategy in paper {
            assert_eq!(strategy.performance.len(), 30);
        }

        let summary = session.dashboard_summary();
        assert_eq!(summary.total_trades, 42 + 78 + 25);
        assert_eq!(summary.active_strategies, 2);
        assert!((summary.total_pnl - (1250.78 - 340.50 + 880.00)).abs() < 1e-9);
    }

    #[test]
    fn test_toggle_paper_flips_activity() {
        let mut generator = SeriesGenerator::new(42);
        let mut session = Session::with_demo_data(&mut generator).unwrap();
        session.apply(SessionEvent::LogIn).unwrap();

        let id = session.paper_strategies()[2].id;
        assert!(!session.paper_strategies()[2].is_active);

        session.apply(SessionEvent::TogglePaper(id)).unwrap();
        assert!(session.paper_strategies()[2].is_active);
    }

    #[test]
    fn test_marketplace_catalog_is_stable() {
        let catalog = marketplace_catalog();
        assert_eq!(catalog.len(), 6);
        assert!(catalog.iter().any(|s| s.name == DEFAULT_FOLLOWED));
    }
}
