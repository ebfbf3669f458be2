use clap::Subcommand;
use serde_json::json;

use crate::auth::hash_password_blocking;
use crate::cli::{connect, utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::{NewUser, ProfileAssignment, Store};
use crate::types::Role;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create an administrator account")]
    CreateAdmin {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long, default_value = "College")]
        first_name: String,

        #[arg(long, default_value = "Admin")]
        last_name: String,

        #[arg(long, default_value = "M", value_parser = ["M", "F"])]
        gender: String,
    },
}

pub async fn handle(
    cmd: UserCommands,
    config: &AppConfig,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        UserCommands::CreateAdmin {
            email,
            password,
            first_name,
            last_name,
            gender,
        } => {
            let min_length = config.security.password_min_length;
            anyhow::ensure!(email.contains('@'), "'{}' is not a valid email address", email);
            anyhow::ensure!(
                password.chars().count() >= min_length,
                "Password must be at least {} characters",
                min_length
            );

            let store = connect(config).await?;
            let new_user = NewUser {
                email: email.trim().to_lowercase(),
                first_name,
                last_name,
                role: Role::Admin,
                gender,
                address: String::new(),
                password_hash: hash_password_blocking(password, config.security.bcrypt_cost).await?,
            };

            let (user, profile) = store
                .create_user_with_profile(new_user, ProfileAssignment::default())
                .await?;

            output_success(
                &output_format,
                &format!("Created admin {}", user.email),
                Some(json!({ "user": user, "profile": profile })),
            )
        }
    }
}
