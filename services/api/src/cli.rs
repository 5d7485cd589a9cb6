use crate::infra::parse_spend;
use crate::report::{run_best, run_cards, run_optimize};
use crate::server;
use card_rewards::config::AppConfig;
use card_rewards::error::AppError;
use card_rewards::telemetry;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Card Rewards Explorer",
    about = "Find the best credit card per spending category from the command line or over HTTP",
    version
)]
struct Cli {
    /// Override the benefit table location (defaults to REWARDS_DATA_PATH)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print every card ranked by average benefit
    Cards(CardsArgs),
    /// Compare up to three cards category by category
    Best(BestArgs),
    /// Rank every card against a monthly spending profile
    Optimize(OptimizeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct CardsArgs {
    /// Emit CSV instead of a text listing
    #[arg(long)]
    pub(crate) csv: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BestArgs {
    /// Card to compare; repeat for up to three cards
    #[arg(long = "card", required = true)]
    pub(crate) cards: Vec<String>,
    /// Emit CSV instead of a text listing
    #[arg(long)]
    pub(crate) csv: bool,
}

#[derive(Args, Debug)]
pub(crate) struct OptimizeArgs {
    /// Monthly spend as CATEGORY=AMOUNT; repeat per category. Defaults to the built-in profile.
    #[arg(long = "spend", value_parser = parse_spend)]
    pub(crate) spend: Vec<(String, f64)>,
    /// Emit CSV instead of a text listing
    #[arg(long)]
    pub(crate) csv: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(data) = cli.data {
        config.rewards.data_path = data;
    }

    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Cards(args) => run_cards(&config, args),
        Command::Best(args) => run_best(&config, args),
        Command::Optimize(args) => run_optimize(&config, args),
    }
}
