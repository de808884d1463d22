use std::path::PathBuf;

use clap::Parser;

use rummy_core::AppInfo;
use rummy_player::config::PlayerConfig;
use rummy_player::logging::init_logging;
use rummy_player::server::{PlayerService, serve};

/// Gin Rummy player that answers a game server over HTTP.
#[derive(Debug, Parser)]
#[command(
    name = "rummy-player",
    author,
    version,
    about = "Autonomous two-player Gin Rummy player"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the player name (required when no config file is given).
    #[arg(long, value_name = "NAME")]
    name: Option<String>,

    /// Override the listening port.
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,

    /// Override the search iterations per lay-down (0 uses the greedy planner).
    #[arg(long, value_name = "COUNT")]
    iterations: Option<u32>,

    /// Override the RNG seed used by the planner.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no server is started).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match (&cli.config, &cli.name) {
        (Some(path), _) => PlayerConfig::from_path(path)?,
        (None, Some(name)) => PlayerConfig::with_name(name.clone()),
        (None, None) => anyhow::bail!("either --config or --name is required"),
    };

    if let Some(name) = cli.name {
        config.player.name = name;
    }

    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if let Some(iterations) = cli.iterations {
        config.search.iterations = Some(iterations);
    }

    if let Some(seed) = cli.seed {
        config.search.seed = Some(seed);
    }

    config.validate()?;

    let search = config.search_config();
    let addr = config.bind_address();
    println!(
        "{} {} as '{}' on {addr} ({} iterations, seed {})",
        AppInfo::name(),
        AppInfo::version(),
        config.player.name,
        search.iterations,
        config.seed()
    );

    if cli.validate_only {
        println!("Validation-only mode: server not started.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging)?;
    if let Some(guard) = logging_guard.as_ref() {
        println!("Structured log: {}", guard.log_path.display());
    }

    let service = PlayerService::new(config.player.name.clone(), search, config.seed());
    serve(&addr, service)?;
    Ok(())
}
