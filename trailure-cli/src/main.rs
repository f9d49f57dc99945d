//! # Trailure CLI
//!
//! Discover travel experiences from the terminal.
//!
//! Usage:
//!   trailure                          interactive session
//!   trailure search <destination>
//!   trailure quick [n]
//!   trailure refine <destination> --card <n> --profile <label>
//!
//! Examples:
//!   trailure search Kyoto --category "Food & Drink"
//!   trailure quick 2 --json
//!   trailure refine Iceland --card 1 --profile "Couple Retreat"
//!   TRAILURE_RELAY_URL=http://127.0.0.1:8787 trailure

mod config;
mod render;
mod repl;

use clap::{Parser, Subcommand};
use config::{Overrides, TrailureConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trailure_error::{Error, Result};
use trailure_explore::{ExploreState, Explorer, Phase, RefinePhase};
use trailure_gateway::{CompletionProvider, Gateway, Provider};

#[derive(Parser)]
#[command(name = "trailure")]
#[command(author, version, about = "Trailure - discover experiences worth traveling for")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: ~/.trailure/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Model to ask
    #[arg(long, global = true)]
    model: Option<String>,

    /// Relay that holds the credential
    #[arg(long, global = true)]
    relay: Option<String>,

    /// Enable verbose output (info logs)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only print results
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a destination and list its experiences
    Search {
        #[arg(required = true)]
        destination: Vec<String>,

        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,

        /// Print the state as JSON
        #[arg(long)]
        json: bool,
    },
    /// List quick destinations, or search one by number
    Quick {
        index: Option<usize>,

        #[arg(long)]
        json: bool,
    },
    /// Tailor one experience to a traveler profile
    Refine {
        #[arg(required = true)]
        destination: Vec<String>,

        /// Card number from the search listing
        #[arg(long, default_value = "1")]
        card: usize,

        /// Traveler profile, e.g. "Solo Explorer"
        #[arg(short, long)]
        profile: String,

        #[arg(long)]
        json: bool,
    },
    /// Interactive session (default)
    Explore,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_explorer(cli: &Cli) -> Result<Explorer<Provider>> {
    let config = match &cli.config {
        Some(path) => TrailureConfig::load(path)?,
        None => TrailureConfig::default_path()
            .map(|path| TrailureConfig::load_or_default(&path))
            .unwrap_or_default(),
    };
    let overrides = Overrides {
        model: cli.model.clone(),
        relay_url: cli.relay.clone(),
    };
    let provider_config = config
        .with_env(|name| std::env::var(name).ok())
        .provider_config(&overrides)?;

    let provider = Provider::from_config(provider_config)?;
    info!(provider = provider.name(), "Provider ready");
    Ok(Explorer::new(Gateway::new(provider)))
}

fn print_state(explorer: &Explorer<Provider>, json: bool) -> Result<()> {
    let state = explorer.state();
    if json {
        let text = serde_json::to_string_pretty(state)
            .map_err(|e| Error::unexpected("failed to serialize state").set_source(e))?;
        println!("{}", text);
    } else if let Some(detail) = &state.detail {
        print!("{}", render::detail(detail));
    } else {
        print!("{}", render::view(state));
    }
    Ok(())
}

/// Fails when the last search ended in an error. Only the message
/// survives the state machine, so the kind is not guessed.
fn ensure_results(state: &ExploreState) -> Result<()> {
    if state.phase == Phase::Failed {
        let message = state.error.clone().unwrap_or_default();
        return Err(Error::unexpected(format!("search failed: {}", message))
            .with_operation("cli::search"));
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let command = match &cli.command {
        Some(Commands::Quick { index: None, .. }) => {
            print!("{}", render::quick_destinations());
            return Ok(());
        }
        _ => cli.command.as_ref(),
    };

    let mut explorer = build_explorer(&cli)?;

    match command {
        Some(Commands::Search { destination, category, json }) => {
            explorer.search(&destination.join(" ")).await;
            if let Some(category) = category {
                explorer.filter_by_category(category);
            }
            print_state(&explorer, *json)?;
            ensure_results(explorer.state())
        }
        Some(Commands::Quick { index: Some(n), json }) => {
            if *n == 0 {
                return Err(Error::invalid_argument("quick destinations start at 1"));
            }
            explorer.search_quick(n - 1).await?;
            print_state(&explorer, *json)?;
            ensure_results(explorer.state())
        }
        Some(Commands::Refine { destination, card, profile, json }) => {
            if !cli.quiet {
                eprintln!("Exploring {}...", destination.join(" "));
            }
            explorer.search(&destination.join(" ")).await;
            if let Err(e) = ensure_results(explorer.state()) {
                print_state(&explorer, *json)?;
                return Err(e);
            }
            if *card == 0 {
                return Err(Error::invalid_argument("cards start at 1"));
            }
            explorer.select_card(card - 1)?;
            explorer.choose_tailor(profile)?;
            explorer.refine().await;
            print_state(&explorer, *json)?;

            let failed = explorer
                .state()
                .detail
                .as_ref()
                .is_some_and(|detail| detail.phase == RefinePhase::Failed);
            if failed {
                return Err(Error::unexpected("couldn't load tailored options").with_operation("cli::refine"));
            }
            Ok(())
        }
        Some(Commands::Quick { index: None, .. }) | Some(Commands::Explore) | None => {
            if !cli.quiet {
                println!("Trailure - discover experiences worth traveling for\n");
            }
            repl::run(&mut explorer, cli.quiet).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e.message());
        std::process::exit(1);
    }
}
