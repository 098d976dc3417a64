use axum::{routing::post, Router};

use crate::{handlers::*, AppState};

pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/fields/upload", post(upload_fields))
        .route("/nomenclature", post(compose))
}
