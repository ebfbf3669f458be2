use serde_json::json;

use crate::cli::{connect, utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::seed::seed_sample_data;

pub async fn handle(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = connect(config).await?;
    store.apply_schema().await?;

    let report = seed_sample_data(&store, config.security.bcrypt_cost).await?;
    let message = if report.created_anything() {
        "Sample data created"
    } else {
        "Sample data already present"
    };

    output_success(&output_format, message, Some(json!({ "report": report })))
}
