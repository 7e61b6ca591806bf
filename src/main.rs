use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};

use vibe_diary::{App, Cli, Config, FileStore, PersistenceGateway, Result, SystemClock, VibeDiary};

pub fn initialize_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(export_dir) = cli.export_dir {
        config.export_dir = export_dir;
    }

    info!("Using data directory {}", config.data_dir.display());
    let gateway =
        PersistenceGateway::new(FileStore::new(&config.data_dir)).with_pretty(config.pretty_storage);

    let opened = VibeDiary::open(gateway, SystemClock);
    for issue in &opened.issues {
        warn!("Starting with defaults: {}", issue);
    }

    let mut app = App::new(opened.into_value(), config, cli.verbose);
    app.run(cli.command).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    info!("Application starting up");
    match run(cli).await {
        Ok(()) => {
            info!("Application shutting down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
