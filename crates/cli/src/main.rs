mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

/// buildact - run client-provided actions against a fully configured build
#[derive(Parser)]
#[command(name = "buildact")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run a build action against a build description
  Run {
    /// Path to the build description (JSON)
    #[arg(long)]
    build: PathBuf,

    /// Path to the action payload (JSON)
    #[arg(long)]
    action: PathBuf,

    /// Only configure the build; do not execute tasks
    #[arg(long)]
    configure_only: bool,

    /// Task to execute, e.g. `:lib:jar` or `plugins/:core:sign`
    #[arg(long = "task", value_name = "TASK")]
    tasks: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// List the available action types
  Actions {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Run {
      build,
      action,
      configure_only,
      tasks,
      format,
    } => {
      let succeeded = cmd::cmd_run(&cmd::RunArgs {
        build,
        action,
        configure_only,
        tasks,
        format,
      })?;
      if !succeeded {
        std::process::exit(1);
      }
    }
    Commands::Actions { format } => cmd::cmd_actions(format)?,
  }

  Ok(())
}
