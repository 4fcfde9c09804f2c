use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tokio::time::Duration;
use tradesim::assistant::StrategyAssistant;
use tradesim::builder::{Condition, IndicatorRule, StrategyForm, TradeAction};
use tradesim::config;
use tradesim::models::{Strategy, StrategyRules};
use tradesim::simulation::{BacktestRunner, SeriesParams};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "tradesim", about = "Paper-trading simulation sandbox")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a simulated backtest and print the report
    Backtest {
        /// Strategy name shown on the report
        #[arg(long, default_value = "My Custom Strategy")]
        name: String,
        /// Number of days to simulate
        #[arg(long, default_value_t = 50)]
        length: usize,
        /// Starting portfolio value (defaults to INITIAL_PORTFOLIO_VALUE or 10000)
        #[arg(long)]
        start_value: Option<f64>,
        /// Random-walk drift bias in [-1, 1]
        #[arg(long, default_value_t = -0.45, allow_negative_numbers = true)]
        drift: f64,
        /// Per-step volatility scale
        #[arg(long, default_value_t = 0.02)]
        volatility: f64,
        /// Seed for reproducible runs (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Simulated latency before results appear
        #[arg(long, default_value_t = 1500)]
        latency_ms: u64,
        /// Use demo-mode sampled statistics instead of derived ones
        #[arg(long)]
        sampled: bool,
    },
    /// Assemble a strategy from visual-builder style inputs
    Build {
        #[arg(long, default_value = "My Custom Strategy")]
        name: String,
        #[arg(long, value_enum, default_value_t = IndicatorArg::SmaCross)]
        indicator: IndicatorArg,
        /// Fast SMA period
        #[arg(long, default_value_t = 50)]
        fast: u32,
        /// Slow SMA period
        #[arg(long, default_value_t = 200)]
        slow: u32,
        /// RSI period
        #[arg(long, default_value_t = 14)]
        period: u32,
        /// RSI level
        #[arg(long, default_value_t = 30)]
        level: u32,
        #[arg(long, value_enum, default_value_t = ConditionArg::CrossesAbove)]
        condition: ConditionArg,
        #[arg(long, value_enum, default_value_t = ActionArg::Buy)]
        action: ActionArg,
    },
    /// Generate a strategy from a plain-English description (needs GEMINI_API_KEY)
    Generate {
        /// e.g. "buy when the 50-day MA crosses above the 200-day MA"
        description: String,
    },
    /// Ask the AI for optimization suggestions for a strategy JSON file
    Optimize {
        /// Path to a strategy JSON file
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IndicatorArg {
    SmaCross,
    Rsi,
    MacdCross,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConditionArg {
    CrossesAbove,
    CrossesBelow,
    IsGreaterThan,
    IsLessThan,
}

impl From<ConditionArg> for Condition {
    fn from(arg: ConditionArg) -> Self {
        match arg {
            ConditionArg::CrossesAbove => Condition::CrossesAbove,
            ConditionArg::CrossesBelow => Condition::CrossesBelow,
            ConditionArg::IsGreaterThan => Condition::IsGreaterThan,
            ConditionArg::IsLessThan => Condition::IsLessThan,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ActionArg {
    Buy,
    Sell,
}

impl From<ActionArg> for TradeAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Buy => TradeAction::Buy,
            ActionArg::Sell => TradeAction::Sell,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Backtest {
            name,
            length,
            start_value,
            drift,
            volatility,
            seed,
            latency_ms,
            sampled,
        } => {
            run_backtest(
                name,
                length,
                start_value,
                drift,
                volatility,
                seed,
                latency_ms,
                sampled,
            )
            .await
        }
        Command::Build {
            name,
            indicator,
            fast,
            slow,
            period,
            level,
            condition,
            action,
        } => build_strategy(name, indicator, fast, slow, period, level, condition, action),
        Command::Generate { description } => generate_strategy(&description).await,
        Command::Optimize { path } => optimize_strategy(&path).await,
    }
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "tradesim=info".to_string()),
        )
        .init();
}

#[allow(clippy::too_many_arguments)]
async fn run_backtest(
    name: String,
    length: usize,
    start_value: Option<f64>,
    drift: f64,
    volatility: f64,
    seed: Option<u64>,
    latency_ms: u64,
    sampled: bool,
) -> Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    tracing::info!("Using seed {}", seed);

    // Ad-hoc strategy wrapper; the simulation only uses the name
    let strategy = Strategy {
        name,
        description: "Ad-hoc strategy run from the command line.".to_string(),
        rules: StrategyRules {
            entry: "(unspecified)".to_string(),
            exit: "(unspecified)".to_string(),
            stop_loss: None,
        },
    };

    let params = SeriesParams {
        length,
        start_value: start_value.unwrap_or_else(config::initial_portfolio_value),
        drift_bias: drift,
        step_volatility: volatility,
        sample_trades: true,
    };

    let mut runner = BacktestRunner::new(seed)
        .with_params(params)
        .with_latency(Duration::from_millis(latency_ms))
        .with_sampled_metrics(sampled);

    let report = runner.run(&strategy).await?;
    report.print_report();

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn build_strategy(
    name: String,
    indicator: IndicatorArg,
    fast: u32,
    slow: u32,
    period: u32,
    level: u32,
    condition: ConditionArg,
    action: ActionArg,
) -> Result<()> {
    let indicator = match indicator {
        IndicatorArg::SmaCross => IndicatorRule::SmaCross { fast, slow },
        IndicatorArg::Rsi => IndicatorRule::Rsi { period, level },
        IndicatorArg::MacdCross => IndicatorRule::MacdCross,
    };

    let form = StrategyForm {
        name,
        indicator,
        condition: condition.into(),
        action: action.into(),
    };

    let strategy = form.build()?;

    println!("Generated Rule: {}", form.rule_text());
    println!("{}", serde_json::to_string_pretty(&strategy)?);

    Ok(())
}

async fn generate_strategy(description: &str) -> Result<()> {
    let assistant = StrategyAssistant::from_env()?;
    let strategy = assistant.generate_strategy(description).await?;

    println!("{}", serde_json::to_string_pretty(&strategy)?);
    Ok(())
}

async fn optimize_strategy(path: &PathBuf) -> Result<()> {
    let contents = std::fs::read_to_string(path)?;
    let strategy: Strategy = serde_json::from_str(&contents)?;

    let assistant = StrategyAssistant::from_env()?;
    let suggestion = assistant.optimize_strategy(&strategy).await?;

    println!("Optimization Suggestion:\n{}", suggestion);
    Ok(())
}
