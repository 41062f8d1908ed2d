//! # cea CLI entry point
//!
//! Parses arguments and dispatches to the subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cea_backend::BackendClient;
use cea_cli::account::{
    backend_from_env, run_cpd_status, run_login, run_logout, run_whoami, CpdArgs, LoginArgs,
};
use cea_cli::compliance::{run_compliance, ComplianceArgs};
use cea_cli::session::SessionFile;
use cea_cli::workflows::{run_workflows, WorkflowsArgs};

/// CEA agent desk command-line tool.
#[derive(Parser, Debug)]
#[command(name = "cea", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Session file; defaults to `$HOME/.cea/session.json`.
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate CPD records from a file.
    Compliance(ComplianceArgs),

    /// Inspect transaction workflows and data categories.
    Workflows(WorkflowsArgs),

    /// Sign in; requires an active CEA license.
    Login(LoginArgs),

    /// Sign out and remove the local session.
    Logout,

    /// Show the signed-in profile.
    Whoami,

    /// CPD status of the signed-in user.
    Cpd(CpdArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<u8> {
    let today = chrono::Local::now().date_naive();
    match cli.command {
        Commands::Compliance(args) => run_compliance(&args),
        Commands::Workflows(args) => run_workflows(&args),
        Commands::Login(args) => {
            let sessions = session_file(cli.session_file)?;
            run_login(&args, &backend_from_env()?, &sessions, today).await
        }
        Commands::Logout => {
            let sessions = session_file(cli.session_file)?;
            run_logout(optional_backend().as_ref(), &sessions).await
        }
        Commands::Whoami => {
            let sessions = session_file(cli.session_file)?;
            run_whoami(optional_backend().as_ref(), &sessions).await
        }
        Commands::Cpd(args) => {
            let sessions = session_file(cli.session_file)?;
            run_cpd_status(&args, &backend_from_env()?, &sessions, today).await
        }
    }
}

fn session_file(path: Option<PathBuf>) -> Result<SessionFile> {
    let path = match path {
        Some(p) => p,
        None => SessionFile::default_path()?,
    };
    Ok(SessionFile::new(path))
}

/// Commands that work from the local session alone run without a backend.
fn optional_backend() -> Option<BackendClient> {
    match backend_from_env() {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::info!("{e:#}; using the local session only");
            None
        }
    }
}
