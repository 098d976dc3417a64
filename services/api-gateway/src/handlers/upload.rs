//! Field Upload Handler
//!
//! Accepts a single marker-delimited sheet as a multipart upload and
//! returns the fields extracted from it.

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    response::Json,
};
use fieldmark_models::Field;
use fieldmark_utils::{validate_file_size, FieldmarkError, FieldmarkResult};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{middleware::ApiError, AppState};

/// Multipart part that carries the uploaded file.
const FILE_PART: &str = "file";

/// Field upload response
#[derive(Debug, Serialize)]
pub struct FieldUploadResponse {
    pub upload_id: Uuid,
    pub filename: String,
    pub total_rows: usize,
    pub fields: Vec<Field>,
    pub warnings: Vec<String>,
}

/// Upload a sheet and extract its fields
///
/// POST /upload
/// POST /api/v1/fields/upload
pub async fn upload_fields(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<FieldUploadResponse>, ApiError> {
    debug!("Upload file request received");

    match process_upload(&state, multipart).await {
        Ok(response) => {
            state
                .metrics
                .record_success(response.fields.len(), response.warnings.len());
            Ok(Json(response))
        }
        Err(error) => {
            state.metrics.record_failure(error.error_code());
            Err(error.into())
        }
    }
}

async fn process_upload(
    state: &AppState,
    mut multipart: Multipart,
) -> FieldmarkResult<FieldUploadResponse> {
    let (filename, data) = read_file_part(&mut multipart)
        .await?
        .ok_or_else(|| FieldmarkError::missing_file("No file part"))?;

    if filename.is_empty() {
        return Err(FieldmarkError::missing_file("No selected file"));
    }
    if !state.config.upload.is_allowed(&filename) {
        return Err(FieldmarkError::unsupported_file_type(filename));
    }
    validate_file_size(data.len(), state.config.server.max_request_size)?;
    info!(filename = %filename, bytes = data.len(), "File received");

    let parser = state.parser.clone();
    let sheet = tokio::task::spawn_blocking(move || parser.parse_bytes(&filename, &data))
        .await
        .map_err(|e| FieldmarkError::internal(format!("parser task failed: {}", e)))??;

    info!(
        upload_id = %sheet.id,
        fields = sheet.fields.len(),
        empty_fields = sheet.fields.iter().filter(|field| field.is_empty()).count(),
        orphan_rows = sheet.orphan_rows(),
        "Sheet parsed successfully"
    );

    Ok(FieldUploadResponse {
        upload_id: sheet.id,
        filename: sheet.filename,
        total_rows: sheet.total_rows,
        fields: sheet.fields,
        warnings: sheet.warnings,
    })
}

/// Find the `file` part, skipping any other form fields.
async fn read_file_part(multipart: &mut Multipart) -> FieldmarkResult<Option<(String, Bytes)>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| FieldmarkError::validation("multipart", e.body_text()))?
    {
        if field.name() != Some(FILE_PART) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| FieldmarkError::validation("multipart", e.body_text()))?;

        return Ok(Some((filename, data)));
    }

    Ok(None)
}
