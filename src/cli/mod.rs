pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::database::PgStore;

#[derive(Parser)]
#[command(name = "college")]
#[command(about = "College CLI - database setup, seeding and account management")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        conflicts_with = "json",
        help = "Output in human-readable text format (default)"
    )]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Database schema management")]
    Db {
        #[command(subcommand)]
        cmd: commands::db::DbCommands,
    },

    #[command(about = "Create the sample course, session, staff, subject and student")]
    Seed,

    #[command(about = "User account management")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },

    #[command(about = "Issue access tokens")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = AppConfig::from_env();

    match cli.command {
        Commands::Db { cmd } => commands::db::handle(cmd, &config, output_format).await,
        Commands::Seed => commands::seed::handle(&config, output_format).await,
        Commands::User { cmd } => commands::user::handle(cmd, &config, output_format).await,
        Commands::Token { cmd } => commands::token::handle(cmd, &config, output_format).await,
    }
}

/// CLI commands always run against PostgreSQL; the in-memory store only
/// lives as long as a server process.
pub(crate) async fn connect(config: &AppConfig) -> anyhow::Result<PgStore> {
    anyhow::ensure!(
        config.database.url.is_some(),
        "DATABASE_URL must be set for CLI commands"
    );
    Ok(PgStore::connect(&config.database).await?)
}
