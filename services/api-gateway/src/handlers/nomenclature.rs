//! Nomenclature Handler
//!
//! Joins the values a user picked for each extracted field into one name.

use axum::{extract::rejection::JsonRejection, response::Json};
use fieldmark_models::{NomenclatureRequest, NomenclatureResponse};
use fieldmark_utils::{compose_nomenclature, validate_model, FieldmarkError};

use crate::middleware::ApiError;

/// POST /api/v1/nomenclature
pub async fn compose(
    payload: Result<Json<NomenclatureRequest>, JsonRejection>,
) -> Result<Json<NomenclatureResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|e| FieldmarkError::validation("body", e.body_text()))?;
    validate_model(&request)?;

    let nomenclature = compose_nomenclature(&request.selections, &request.separator);
    tracing::debug!(
        selections = request.selections.len(),
        nomenclature = %nomenclature,
        "Composed nomenclature"
    );

    Ok(Json(NomenclatureResponse { nomenclature }))
}
