//! Operator CLI for the profile repository and OTP dispatch.
//!
//! Every command prints one JSON object on stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use profile_core::config::{Config, DatabaseConfig};
use profile_core::kernel::{connect_store, ProfileDeps};
use serde::Serialize;
use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "profilectl")]
#[command(about = "Inspect profiles and drive OTP flows")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the document table and indexes
    Migrate,

    #[command(flatten)]
    Profile(ProfileCommand),
}

/// Commands that need the repository and the OTP service
#[derive(Subcommand)]
enum ProfileCommand {
    /// Find the profile holding a verified identifier
    Lookup {
        #[arg(long)]
        identifier: String,
    },

    /// Send an OTP on the primary channel
    SendOtp {
        #[arg(long)]
        phone: String,
    },

    /// Re-send an OTP on a fallback channel (1 = WhatsApp, 2 = voice/SMS)
    RetryOtp {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        step: i32,
    },

    /// Verify an OTP sent to a phone number
    VerifyOtp {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        code: String,
    },

    /// Verify an OTP sent to an email address
    VerifyEmailOtp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },

    /// Enroll a profile in the experiment programme
    Enroll {
        #[arg(long)]
        profile_id: String,
    },

    /// Remove a profile from the experiment programme
    Unenroll {
        #[arg(long)]
        profile_id: String,
    },
}

// ============================================================================
// JSON Response
// ============================================================================

#[derive(Serialize)]
struct Response {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl Response {
    fn ok(data: Value) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    fn failed(err: &anyhow::Error) -> Self {
        Self {
            success: false,
            message: Some(format!("{:#}", err)),
            data: None,
        }
    }
}

fn output(resp: &Response) -> Result<()> {
    println!("{}", serde_json::to_string(resp)?);
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,profile_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(data) => output(&Response::ok(data)),
        Err(err) => {
            tracing::error!(error = %format!("{:#}", err), "Command failed");
            output(&Response::failed(&err))?;
            std::process::exit(1);
        }
    }
}

async fn run(command: Commands) -> Result<Value> {
    match command {
        Commands::Migrate => {
            // Connecting creates the schema
            let database = DatabaseConfig::from_env().context("Failed to load configuration")?;
            connect_store(&database).await?;
            Ok(json!({ "migrated": true }))
        }
        Commands::Profile(command) => {
            let config = Config::from_env().context("Failed to load configuration")?;
            let deps = ProfileDeps::from_config(&config).await?;
            run_profile(command, &deps).await
        }
    }
}

async fn run_profile(command: ProfileCommand, deps: &ProfileDeps) -> Result<Value> {
    let data = match command {
        ProfileCommand::Lookup { identifier } => {
            let profile = deps.profiles.get_profile_by_identifier(&identifier).await?;
            serde_json::to_value(profile)?
        }
        ProfileCommand::SendOtp { phone } => {
            let otp = deps.otp.generate_and_send_otp(&phone).await?;
            serde_json::to_value(otp)?
        }
        ProfileCommand::RetryOtp { phone, step } => {
            let otp = deps.otp.send_retry_otp(&phone, step).await?;
            serde_json::to_value(otp)?
        }
        ProfileCommand::VerifyOtp { phone, code } => {
            json!({ "verified": deps.otp.verify_otp(&phone, &code).await? })
        }
        ProfileCommand::VerifyEmailOtp { email, code } => {
            json!({ "verified": deps.otp.verify_email_otp(&email, &code).await? })
        }
        ProfileCommand::Enroll { profile_id } => {
            let profile = deps.profiles.get_profile_by_id(&profile_id).await?;
            json!({ "enrolled": deps.profiles.add_experiment_participant(&profile).await? })
        }
        ProfileCommand::Unenroll { profile_id } => {
            let profile = deps.profiles.get_profile_by_id(&profile_id).await?;
            json!({ "removed": deps.profiles.remove_experiment_participant(&profile).await? })
        }
    };

    Ok(data)
}
