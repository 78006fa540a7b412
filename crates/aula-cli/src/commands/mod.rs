//! CLI command definitions and dispatch.

pub mod access;
pub mod request;
pub mod session;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::{self, OutputFormat};
use aula_auth::session::LoginRedirect;
use aula_client::ApiClient;
use aula_core::config::AppConfig;
use aula_core::error::AppError;

/// Aula: academic platform client
#[derive(Debug, Parser)]
#[command(name = "aula", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and the environment overlays
    #[arg(short, long = "config", default_value = "config")]
    pub config_dir: String,

    /// Environment overlay to apply on top of default.toml
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login(session::LoginArgs),
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Evaluate named UI actions for the signed-in user
    Can(access::CanArgs),
    /// Check permission codes held by the signed-in user
    Permissions(access::PermissionsArgs),
    /// Check whether the signed-in user may edit a course or task
    CanEdit(access::CanEditArgs),
    /// Send an authenticated GET request and print the body
    Get(request::GetArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        let client = build_client(config)?;
        match &self.command {
            Commands::Login(args) => session::login(args, &client, self.format).await,
            Commands::Logout => session::logout(&client),
            Commands::Whoami => session::whoami(&client, self.format),
            Commands::Can(args) => access::can(args, &client, self.format),
            Commands::Permissions(args) => access::permissions(args, &client, self.format),
            Commands::CanEdit(args) => access::can_edit(args, &client, self.format).await,
            Commands::Get(args) => request::get(args, &client).await,
        }
    }
}

/// Tells the user to sign in again once the session cannot be refreshed.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliRedirect;

impl LoginRedirect for CliRedirect {
    fn redirect_to_login(&self) {
        output::print_warning("Session expired. Run `aula login` to sign in again.");
    }
}

/// Helper: build the API client from configuration
pub fn build_client(config: &AppConfig) -> Result<ApiClient, AppError> {
    ApiClient::from_config(config, Arc::new(CliRedirect))
}

/// Helper: restore the session or explain how to get one
pub fn require_session(client: &ApiClient) -> Result<aula_auth::Session, AppError> {
    client
        .restore_session()
        .ok_or_else(|| AppError::session("Not logged in. Run `aula login` first."))
}
