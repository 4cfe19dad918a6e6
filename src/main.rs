use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use authgate::config::{config_schema, load_config, ConfigV1};
use authgate::guards::RouteGuard;
use authgate::utils::logger::init_logging;
use authgate::{AuthError, AuthTransport, Location, Session};

/// Probe an authentication back-end the way a browser client would.
#[derive(Parser)]
#[command(name = "authgate", version)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, short, default_value = "./config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the JSON schema of the configuration file.
    Schema,
    /// Fetch the current user and print the authentication state.
    Current,
    /// Log in with JSON credentials and print the authentication state.
    Login {
        /// e.g. '{"username": "sjonnyb", "password": "..."}'
        #[arg(long)]
        credentials: String,
    },
    /// Fetch the current user and print the guard decision for a path.
    Check {
        path: String,
        /// Require this entry in the user's `roles` array.
        #[arg(long)]
        role: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Command::Schema = cli.command {
        return match print_json(&config_schema()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error printing schema: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: ConfigV1) -> Result<(), AuthError> {
    let session: Session<Value> = Session::configure(config.session);
    let transport = AuthTransport::new(session.clone(), &config.transport)?;

    match command {
        Command::Schema => print_json(&config_schema()),
        Command::Current => {
            transport.fetch_current_user().await?;
            print_json(&session.store().get_state())
        }
        Command::Login { credentials } => {
            let credentials: Value = serde_json::from_str(&credentials)?;
            transport.login(&credentials).await?;
            print_json(&session.store().get_state())
        }
        Command::Check { path, role } => {
            // Not being logged in is an answer here, not a failure.
            match transport.fetch_current_user().await {
                Err(e) if e.status() != Some(StatusCode::UNAUTHORIZED) => return Err(e),
                _ => {}
            }

            let guard = RouteGuard::new(session);
            let location = Location::parse(&path);
            let decision = match role {
                Some(role) => guard.is_authorized(&location, &|user: &Value| has_role(user, &role)),
                None => guard.is_authenticated(&location),
            };
            print_json(&decision)
        }
    }
}

fn has_role(user: &Value, role: &str) -> bool {
    user["roles"]
        .as_array()
        .map(|roles| roles.iter().any(|r| r.as_str() == Some(role)))
        .unwrap_or(false)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AuthError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
