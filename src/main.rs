//! jobwatch - daily job-posting notifier.
//!
//! Usage:
//!   jobwatch run          Start the daily scheduler and the HTTP server
//!   jobwatch once         Run a single search cycle and print its report
//!   jobwatch show-config  Print the persisted search configuration
//!   jobwatch next-fire    Print when the next scheduled cycle would start

use chrono::Utc;
use clap::{Parser, Subcommand};
use jobwatch::{
    ApiConfig, AppContext, DailySchedule, FileStore, Settings, StateStore, start_server,
};
use std::path::PathBuf;
use tracing::{error, info};

/// jobwatch - daily job-posting notifier
#[derive(Parser)]
#[command(name = "jobwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a YAML settings file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daily scheduler and the HTTP server
    Run {
        /// Skip registering slash commands at startup
        #[arg(long)]
        no_sync: bool,
    },

    /// Run a single search cycle now and exit
    Once,

    /// Print the persisted search configuration
    ShowConfig,

    /// Print the next scheduled fire time
    NextFire,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    // Initialize logging
    let _log_guard = jobwatch::logging::init(&settings.logging)?;

    match cli.command {
        Commands::Run { no_sync } => run(settings, no_sync).await?,
        Commands::Once => run_once(settings).await?,
        Commands::ShowConfig => show_config(settings).await?,
        Commands::NextFire => next_fire(settings).await?,
    }

    Ok(())
}

/// Run the scheduler and HTTP server until Ctrl+C.
async fn run(settings: Settings, no_sync: bool) -> Result<(), Box<dyn std::error::Error>> {
    let api_config = ApiConfig::from(&settings.api);
    let ctx = AppContext::build(settings).await?;

    if !no_sync {
        ctx.sync_commands().await;
    }

    let (handle, scheduler_task) = ctx.scheduler().start().await?;
    let server = start_server(api_config, ctx.api_state(handle.clone())?).await?;

    info!("Press Ctrl+C to stop");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
            handle.shutdown().await?;
        }
        _ = scheduler_task => {
            error!("Scheduler stopped unexpectedly");
        }
    }

    server.abort();
    info!("Goodbye!");
    Ok(())
}

/// Run exactly one cycle and print its report.
async fn run_once(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = AppContext::build(settings).await?;
    let report = ctx.cycle.run().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Print the persisted search configuration.
async fn show_config(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open(settings.data_dir.clone()).await?;
    let config = store.load_config().await?;

    println!("Location:       {}", config.location);
    println!("Radius:         {} km", config.radius);
    println!("Keywords:       {}", config.keywords.join(", "));
    println!("Work type:      {}", config.work_type);
    println!("Execution time: {} ({})", config.execution_time, settings.timezone);
    Ok(())
}

/// Print when the next cycle would start if the scheduler were started now.
async fn next_fire(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open(settings.data_dir.clone()).await?;
    let config = store.load_config().await?;
    let schedule = DailySchedule::new(config.execution_time()?, &settings.timezone)?;

    let next = schedule.next_after(Utc::now());
    println!(
        "{} ({})",
        next.with_timezone(&schedule.timezone()).format("%Y-%m-%d %H:%M %Z"),
        next.to_rfc3339()
    );
    Ok(())
}
