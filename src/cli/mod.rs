pub mod output;
pub mod process;
pub mod stats;
pub mod upload;

use std::{env, path::PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use process::{kill_previous_servers, restart_server};
use tracing::level_filters::LevelFilter;

use crate::{
    daemon::{args::ServeArgs, start_daemon, DaemonPaths},
    key_source::{open_key_source, SourceKind},
    utils::{
        dir::{create_application_default_path, home_dir},
        logging::{enable_logging, CLI_PREFIX, DAEMON_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Keyrace", version, long_about = None)]
#[command(about = "Counts your keystrokes and races them on a daily leaderboard")]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Starts a detached daemon counting system-wide key presses")]
    Init {
        #[command(flatten)]
        serve: ServeArgs,
    },
    #[command(
        about = "Run the daemon directly in the current console. Used for creating a daemon internally and for debugging"
    )]
    Serve {
        #[command(flatten)]
        serve: ServeArgs,
    },
    #[command(about = "Stop currently running daemon.")]
    Stop {},
    #[command(about = "Display today's counts")]
    Stats {
        #[arg(long = "counts-dir", help = "Directory with the count files. By default $HOME")]
        counts_dir: Option<PathBuf>,
    },
    #[command(about = "Upload today's count once and print the leaderboard")]
    Upload {
        #[arg(long, help = "Application directory holding settings.json")]
        dir: Option<PathBuf>,
        #[arg(long = "counts-dir", help = "Directory with the count files. By default $HOME")]
        counts_dir: Option<PathBuf>,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    match args.commands {
        Commands::Serve { serve } => run_serve(serve).await,
        Commands::Init { serve } => {
            if serve.source != SourceKind::Keyboard {
                bail!("A detached daemon can't read stdin, use --source keyboard");
            }
            enable_cli_logging(args.log)?;
            restart_server(&serve)?;
            Ok(())
        }
        Commands::Stop {} => {
            enable_cli_logging(args.log)?;
            let process_name = env::current_exe()?;
            kill_previous_servers(&process_name)?;
            Ok(())
        }
        Commands::Stats { counts_dir } => {
            enable_cli_logging(args.log)?;
            stats::print_stats(&counts_dir.map_or_else(home_dir, Ok)?).await
        }
        Commands::Upload { dir, counts_dir } => {
            enable_cli_logging(args.log)?;
            let app_dir = dir.map_or_else(create_application_default_path, Ok)?;
            let counts_dir = counts_dir.map_or_else(home_dir, Ok)?;
            upload::upload_once(&app_dir, &counts_dir).await
        }
    }
}

async fn run_serve(serve: ServeArgs) -> Result<()> {
    let app_dir = serve.dir.clone().map_or_else(create_application_default_path, Ok)?;
    let counts_dir = serve.counts_dir.clone().map_or_else(home_dir, Ok)?;
    enable_logging(DAEMON_PREFIX, &app_dir.join("logs"), serve.log, serve.log_console)?;

    let source = open_key_source(serve.source)?;
    start_daemon(
        DaemonPaths {
            app_dir,
            counts_dir,
        },
        source,
    )
    .await
}

fn enable_cli_logging(log: bool) -> Result<()> {
    let logging_level = if log { Some(LevelFilter::TRACE) } else { None };
    let app_dir = create_application_default_path()?;
    enable_logging(CLI_PREFIX, &app_dir.join("logs"), logging_level, log)
}
