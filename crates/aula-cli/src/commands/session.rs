//! Session CLI commands.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use aula_auth::Session;
use aula_client::ApiClient;
use aula_core::error::AppError;

/// Arguments for the login command
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (will prompt if not provided)
    #[arg(short, long)]
    pub username: Option<String>,
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Signed-in user summary
#[derive(Debug, Serialize, Tabled)]
struct WhoamiRow {
    /// User ID
    id: String,
    /// Name
    name: String,
    /// Role
    role: String,
    /// Superuser
    superuser: String,
    /// Staff
    staff: String,
    /// Expires
    expires: String,
    /// Remaining
    remaining: String,
}

impl WhoamiRow {
    fn from_session(session: &Session) -> Self {
        let user = &session.user;
        Self {
            id: user
                .id()
                .map(|id| id.as_str().to_string())
                .unwrap_or_else(|| "-".to_string()),
            name: user.display_name().to_string(),
            role: user.role().to_string(),
            superuser: output::mark(user.is_superuser()).to_string(),
            staff: output::mark(user.is_staff()).to_string(),
            expires: session
                .expires_at()
                .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "-".to_string()),
            remaining: remaining(session.claims.remaining_ttl_seconds()),
        }
    }
}

fn remaining(ttl_seconds: u64) -> String {
    match ttl_seconds {
        0 => "expired".to_string(),
        s if s < 60 => format!("{s}s"),
        s if s < 3600 => format!("{}m {}s", s / 60, s % 60),
        s => format!("{}h {}m", s / 3600, (s % 3600) / 60),
    }
}

/// Execute the login command
pub async fn login(
    args: &LoginArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    let username = match &args.username {
        Some(u) => u.clone(),
        None => dialoguer::Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
    };

    let password = match &args.password {
        Some(p) => p.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
    };

    let session = client.authenticate(&username, &password).await?;
    output::print_success(&format!(
        "Logged in as '{}' ({})",
        session.user.display_name(),
        session.user.role()
    ));
    if format == OutputFormat::Json {
        output::print_json(&WhoamiRow::from_session(&session));
    }
    Ok(())
}

/// Execute the logout command
pub fn logout(client: &ApiClient) -> Result<(), AppError> {
    client.logout()?;
    output::print_success("Logged out");
    Ok(())
}

/// Execute the whoami command
pub fn whoami(client: &ApiClient, format: OutputFormat) -> Result<(), AppError> {
    let Some(session) = client.restore_session() else {
        output::print_warning("Not logged in. Run `aula login` to sign in.");
        return Ok(());
    };

    let row = WhoamiRow::from_session(&session);
    match format {
        OutputFormat::Table => {
            output::print_rows(&[row], format, "");
            let roles: Vec<&str> = session.user.roles().iter().map(|r| r.name.as_str()).collect();
            if !roles.is_empty() {
                output::print_kv("Backend roles", &roles.join(", "));
            }
            let groups = &session.user.hints().groups;
            if !groups.is_empty() {
                output::print_kv("Groups", &groups.join(", "));
            }
        }
        OutputFormat::Json => output::print_json(&row),
    }
    Ok(())
}
