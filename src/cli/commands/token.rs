use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::auth::generate_jwt;
use crate::cli::{connect, OutputFormat};
use crate::config::AppConfig;
use crate::database::Store;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a bearer token for an existing user")]
    Issue {
        #[arg(long)]
        email: String,
    },
}

pub async fn handle(
    cmd: TokenCommands,
    config: &AppConfig,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { email } => {
            let store = connect(config).await?;
            let user = store
                .find_user_by_email(&email)
                .await?
                .with_context(|| format!("No user with email {}", email))?;
            let token = generate_jwt(&user, &config.security)?;

            match output_format {
                OutputFormat::Json => {
                    let response = json!({
                        "status": "success",
                        "token": token,
                        "expires_in": config.security.session_timeout_secs,
                        "role": user.role(),
                    });
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
                // Bare token so it can be captured with $(college token issue ...)
                OutputFormat::Text => println!("{}", token),
            }
            Ok(())
        }
    }
}
