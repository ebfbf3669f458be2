use clap::Subcommand;
use serde_json::json;

use crate::cli::{connect, utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::Store;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create missing tables and indexes")]
    Init,

    #[command(about = "Show record counts per table")]
    Status,
}

pub async fn handle(
    cmd: DbCommands,
    config: &AppConfig,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let store = connect(config).await?;

    match cmd {
        DbCommands::Init => {
            store.apply_schema().await?;
            output_success(&output_format, "Database schema is up to date", None)
        }
        DbCommands::Status => {
            let counts = store.counts().await?;
            if let OutputFormat::Text = output_format {
                crate::cli::utils::print_fields(&[
                    ("users", counts.users.to_string()),
                    ("admins", counts.admins.to_string()),
                    ("staff", counts.staff.to_string()),
                    ("students", counts.students.to_string()),
                    ("courses", counts.courses.to_string()),
                    ("sessions", counts.sessions.to_string()),
                    ("subjects", counts.subjects.to_string()),
                ]);
                return Ok(());
            }
            output_success(&output_format, "Record counts", Some(json!({ "counts": counts })))
        }
    }
}
