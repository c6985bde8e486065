use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Reports service version, database reachability and the active search backend.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let db_healthy = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .is_ok();

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "mediacms-api",
        "db_healthy": db_healthy,
        "search_backend": state.search.backend(),
    }))
}
