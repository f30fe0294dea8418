use axum::routing::{get, post};
use axum::Router;

use crate::handlers::performance;
use crate::state::AppState;

/// Performance grid routes mounted at `/performances`.
///
/// ```text
/// GET  /             -> list_performances
/// GET  /options      -> list_performance_options
/// GET  /preferences  -> list_preferences
/// GET  /columns      -> get_columns
/// POST /actions      -> apply_actions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(performance::list_performances))
        .route("/options", get(performance::list_performance_options))
        .route("/preferences", get(performance::list_preferences))
        .route("/columns", get(performance::get_columns))
        .route("/actions", post(performance::apply_actions))
}
