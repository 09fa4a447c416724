use axum::{routing::post, Router};

use crate::{handlers::*, AppState};

pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/bom/import/file", post(import_file))
        .route("/bom/import/text", post(import_text))
        .route("/bom/lines", post(extract_lines))
}
