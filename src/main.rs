// Copyright (c) 2026 The trend-dash Authors. All rights reserved.

mod api;
mod cli_messages;
mod config;
mod consts;
mod environment;
mod events;
mod launcher;
mod logging;
mod poller;
mod render;
mod session;
mod ui;

use crate::api::Endpoint;
use crate::config::{Config, SourceSpec, get_config_path};
use crate::consts::cli_consts::polling;
use crate::environment::Environment;
use crate::launcher::{WorkflowLauncher, editor_url};
use crate::session::{run_headless_mode, run_once, run_tui_mode, setup_session};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

/// Options shared by every command that polls the API
#[derive(ClapArgs)]
struct SourceArgs {
    /// Config file to read sources from. Defaults to ~/.trend-dash/config.json
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// API base URL, overriding the config file and TREND_DASH_ENVIRONMENT
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Also poll the search endpoint with this query
    #[arg(long, value_name = "QUERY")]
    search: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Start polling and show the dashboard
    Start {
        #[command(flatten)]
        sources: SourceArgs,

        /// Print events to the console instead of running the TUI
        #[arg(long, default_value = "false")]
        headless: bool,

        /// Paint a background color behind the dashboard
        #[arg(long, default_value = "false")]
        with_background: bool,
    },
    /// Fetch every source once, print the results and exit
    Once {
        #[command(flatten)]
        sources: SourceArgs,
    },
    /// List the configured sources
    Sources {
        /// Config file to read sources from. Defaults to ~/.trend-dash/config.json
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
    /// Write the default configuration file
    InitConfig {
        /// Where to write the file. Defaults to ~/.trend-dash/config.json
        #[arg(long, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, default_value = "false")]
        force: bool,
    },
    /// Start the workflow automation engine with its local environment
    LaunchWorkflow {
        /// Program to run
        #[arg(long, default_value = consts::cli_consts::workflow::DEFAULT_PROGRAM)]
        program: String,

        /// Arguments passed to the program. Defaults to `start`
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init_logger();

    let environment_str = std::env::var("TREND_DASH_ENVIRONMENT").unwrap_or_default();
    let environment = environment_str
        .parse::<Environment>()
        .unwrap_or(Environment::default());

    let args = Args::parse();
    match args.command {
        Command::Start {
            sources,
            headless,
            with_background,
        } => {
            let config = load_config(sources.config, sources.search)?;
            let session = setup_session(&config, environment, sources.base_url)?;
            if headless {
                run_headless_mode(session).await
            } else {
                run_tui_mode(session, with_background).await
            }
        }
        Command::Once { sources } => {
            let config = load_config(sources.config, sources.search)?;
            let session = setup_session(&config, environment, sources.base_url)?;
            if let Err(e) = run_once(session).await {
                print_cmd_error!("Not every source could be fetched", &e.to_string());
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Sources { config } => {
            let config = load_config(config, None)?;
            for source in &config.sources {
                let status = if source.enabled { "" } else { " (disabled)" };
                println!(
                    "{:<16} every {:>6}s  {}{}",
                    source.id,
                    source.interval_ms / 1000,
                    source.endpoint.request().path,
                    status
                );
            }
            Ok(())
        }
        Command::InitConfig { path, force } => {
            let path = match path {
                Some(path) => path,
                None => get_config_path()?,
            };
            if path.exists() && !force {
                print_cmd_warn!(
                    "Config already exists",
                    "{} (use --force to overwrite)",
                    path.display()
                );
                return Ok(());
            }
            Config::default().save(&path)?;
            print_cmd_success!("Config written", "{}", path.display());
            Ok(())
        }
        Command::LaunchWorkflow { program, args } => {
            let launcher = if args.is_empty() {
                WorkflowLauncher::new(
                    program,
                    consts::cli_consts::workflow::DEFAULT_ARGS
                        .iter()
                        .map(|arg| arg.to_string())
                        .collect(),
                )
            } else {
                WorkflowLauncher::new(program, args)
            };
            print_cmd_info!("Starting workflow engine", "editor at {}", editor_url());
            match launcher.run().await {
                Ok(status) if status.success() => {
                    print_cmd_success!("Workflow engine exited", "{}", status);
                    Ok(())
                }
                Ok(status) => {
                    print_cmd_warn!("Workflow engine exited", "{}", status);
                    std::process::exit(status.code().unwrap_or(1));
                }
                Err(e) => {
                    print_cmd_error!("Workflow engine failed to start", &e.to_string());
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Loads the config file, or the stock dashboard if there is none, and adds
/// a search source when a query was given.
fn load_config(path: Option<PathBuf>, search: Option<String>) -> Result<Config, Box<dyn Error>> {
    let path = match path {
        Some(path) => path,
        None => get_config_path()?,
    };
    let mut config = Config::load_or_default(&path)?;
    if let Some(query) = search {
        config.sources.push(SourceSpec::new(
            "search",
            Endpoint::Search { query },
            polling::TRENDING_INTERVAL_MS,
        ));
    }
    Ok(config)
}
