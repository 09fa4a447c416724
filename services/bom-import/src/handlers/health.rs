use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "execbom-import",
        "version": env!("CARGO_PKG_VERSION"),
        "limits": {
            "max_rows": state.config.import.max_rows,
            "max_request_size": state.config.server.max_request_size,
        }
    }))
}
