// handlers/protected/uploads.rs - POST /api/uploads/validate handler

use axum::extract::State;
use serde_json::{json, Value};

use crate::gate::ParsedJson;
use crate::middleware::{ApiResponse, ApiResult};
use crate::security::{validate_upload, FileMeta};
use crate::state::AppState;

/**
 * POST /api/uploads/validate - Check file metadata against the upload limits
 *
 * Expected Input:
 * ```json
 * { "name": "transcript.pdf", "size_bytes": 102400 }
 * ```
 *
 * Only metadata is checked; no file content is accepted or stored.
 * Oversized files get 413, disallowed extensions 415.
 */
pub async fn validate_post(State(state): State<AppState>, body: ParsedJson) -> ApiResult<Value> {
    let file: FileMeta = body.decode()?;
    validate_upload(&file, &state.config.upload)?;

    Ok(ApiResponse::success(json!({
        "name": file.name,
        "size_bytes": file.size_bytes,
        "valid": true
    })))
}
