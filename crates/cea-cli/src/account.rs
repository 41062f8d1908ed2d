//! # Account Subcommands
//!
//! `login`, `logout`, `whoami` and `cpd status` against the hosted backend.
//! The backend is configured from `CEA_BACKEND_URL` and
//! `CEA_BACKEND_ANON_KEY`; the session lives in a [`SessionFile`].

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Utc};
use clap::{Args, Subcommand};

use cea_backend::{BackendClient, BackendConfig};
use cea_compliance::evaluate;
use cea_core::UserProfile;

use crate::compliance::{exit_code, print_report};
use crate::session::{SessionFile, StoredSession};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Sign-in email.
    #[arg(long)]
    pub email: String,
    /// Environment variable holding the password.
    #[arg(long, default_value = "CEA_PASSWORD")]
    pub password_env: String,
}

#[derive(Args, Debug)]
pub struct CpdArgs {
    #[command(subcommand)]
    pub command: CpdCommand,
}

#[derive(Subcommand, Debug)]
pub enum CpdCommand {
    /// Evaluate the signed-in user's completed records for a year.
    Status {
        /// Compliance year; defaults to the current year.
        #[arg(long)]
        year: Option<i32>,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Backend client from the environment.
pub fn backend_from_env() -> Result<BackendClient> {
    let config = BackendConfig::from_env().context("backend not configured")?;
    BackendClient::new(config).context("creating backend client")
}

/// Sign in, check the license and persist the session.
pub async fn run_login(
    args: &LoginArgs,
    backend: &BackendClient,
    sessions: &SessionFile,
    today: NaiveDate,
) -> Result<u8> {
    let password = std::env::var(&args.password_env)
        .with_context(|| format!("password variable {} is not set", args.password_env))?;
    let licensed = backend
        .sign_in_licensed(args.email.trim(), &password, today)
        .await
        .context("sign-in failed")?;
    let token = licensed.session.access_token.clone();

    let profile = match backend.load_profile(&token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(error = %e, "profile load failed; storing license details only");
            UserProfile::combine(&licensed.session.user, None, Some(licensed.license), false)
        }
    };

    sessions.save(&StoredSession {
        access_token: token,
        profile: profile.clone(),
        saved_at: Utc::now(),
    })?;
    println!(
        "Signed in as {} ({}, {})",
        profile.user_name, profile.cea_registration_number, profile.role
    );
    Ok(0)
}

/// Sign out of the backend if it is reachable, then drop the local session.
pub async fn run_logout(backend: Option<&BackendClient>, sessions: &SessionFile) -> Result<u8> {
    let Some(stored) = sessions.load()? else {
        println!("Not signed in.");
        return Ok(0);
    };
    if let Some(backend) = backend {
        if let Err(e) = backend.auth().sign_out(&stored.access_token).await {
            tracing::warn!(error = %e, "backend sign-out failed");
        }
    }
    sessions.clear()?;
    println!("Signed out.");
    Ok(0)
}

/// Print the profile, refreshed from the backend when possible.
pub async fn run_whoami(backend: Option<&BackendClient>, sessions: &SessionFile) -> Result<u8> {
    let mut stored = sessions.require()?;
    let mut cached = true;

    if let Some(backend) = backend {
        match backend.load_profile(&stored.access_token).await {
            Ok(profile) => {
                stored.profile = profile;
                stored.saved_at = Utc::now();
                sessions.save(&stored)?;
                cached = false;
            }
            Err(e) if e.is_unauthorized() => {
                return Err(e).context("session expired; run `cea login` again");
            }
            Err(e) => tracing::warn!(error = %e, "showing cached profile"),
        }
    }

    print!("{}", render_profile(&stored.profile));
    if cached {
        println!("(cached {})", stored.saved_at.format("%Y-%m-%d %H:%M UTC"));
    }
    Ok(0)
}

/// Fetch the year's completed records and evaluate them.
///
/// The stored compliance flag is not changed.
pub async fn run_cpd_status(
    args: &CpdArgs,
    backend: &BackendClient,
    sessions: &SessionFile,
    today: NaiveDate,
) -> Result<u8> {
    let CpdCommand::Status { year, json } = &args.command;
    let year = year.unwrap_or_else(|| today.year());
    let stored = sessions.require()?;
    let records = backend
        .cpd()
        .completed_for_year(&stored.access_token, stored.profile.id, year)
        .await
        .with_context(|| format!("fetching CPD records for {year}"))?;
    let report = evaluate(year, &records);
    print_report(&report, *json)?;
    Ok(exit_code(&report))
}

pub fn render_profile(profile: &UserProfile) -> String {
    format!(
        "{}\n  email:      {}\n  mobile:     {}\n  CEA reg no: {}\n  role:       {}\n  license:    {}\n  CPD:        {}\n",
        profile.name,
        profile.email,
        if profile.mobile.is_empty() { "-" } else { &profile.mobile },
        profile.cea_registration_number,
        profile.role,
        profile.status.as_str(),
        if profile.cpd_compliance_status { "compliant" } else { "not compliant" },
    )
}
