//! Raw request CLI command.

use clap::Args;

use aula_client::ApiClient;
use aula_core::error::AppError;

/// Arguments for the get command
#[derive(Debug, Args)]
pub struct GetArgs {
    /// Path relative to the API base URL, e.g. /api/asignaturas/
    pub path: String,
}

/// Execute the get command
pub async fn get(args: &GetArgs, client: &ApiClient) -> Result<(), AppError> {
    let response = client.get(&args.path).await?;
    let body = serde_json::to_string_pretty(&response.body)?;
    println!("{}", body);
    Ok(())
}
