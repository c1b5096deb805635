use std::path::PathBuf;

use bootcheck::{Error, Result, cmd, config::Config};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for bootcheck
#[derive(Parser)]
#[command(name = "bootcheck")]
#[command(about = "Startup preflight checks and properties cleanup migrations")]
#[command(version)]
struct Cli {
   #[arg(long, env = "BOOTCHECK_CONFIG", global = true, help = "Config file path")]
   config: Option<PathBuf>,

   #[command(subcommand)]
   command: Cmd,
}

/// Available subcommands for bootcheck
#[derive(Subcommand)]
enum Cmd {
   #[command(about = "Run preflight checks and stop at the first failure")]
   Check {
      #[arg(
         short = 'o',
         long = "option",
         value_name = "NAME=VALUE",
         help = "Require an option (environment variable) to have this value (repeatable)"
      )]
      options: Vec<String>,

      #[arg(short = 'q', long, help = "Print nothing on success")]
      quiet: bool,
   },

   #[command(about = "Run every preflight check and report each result")]
   Doctor {
      #[arg(
         short = 'o',
         long = "option",
         value_name = "NAME=VALUE",
         help = "Require an option (environment variable) to have this value (repeatable)"
      )]
      options: Vec<String>,

      #[arg(long, help = "JSON output")]
      json: bool,
   },

   #[command(about = "Delete global subscriptions to new-issue notifications")]
   Migrate {
      #[arg(short = 'd', long, help = "Properties database (default: from config)")]
      database: Option<PathBuf>,

      #[arg(long, help = "Rows per batch (default: from config)")]
      batch_size: Option<usize>,

      #[arg(long, help = "Count affected rows without deleting")]
      dry_run: bool,

      #[arg(long, help = "JSON output")]
      json: bool,
   },
}

fn main() {
   tracing_subscriber::fmt()
      .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
      .with_writer(std::io::stderr)
      .init();

   let cli = Cli::parse();
   if let Err(err) = run(cli) {
      match &err {
         Error::Preflight(e) => eprintln!("{}", e.message()),
         other => eprintln!("{other}"),
      }
      std::process::exit(err.exit_code());
   }
}

fn run(cli: Cli) -> Result<()> {
   let cfg = Config::load_from(cli.config.as_deref())?;

   match cli.command {
      Cmd::Check { options, quiet } => cmd::check::execute(&cfg, options, quiet),
      Cmd::Doctor { options, json } => cmd::doctor::execute(&cfg, options, json),
      Cmd::Migrate { database, batch_size, dry_run, json } => {
         cmd::migrate::execute(&cfg, database, batch_size, dry_run, json)
      },
   }
}
