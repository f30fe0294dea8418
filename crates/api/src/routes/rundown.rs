use axum::routing::{get, post};
use axum::Router;

use crate::handlers::rundown;
use crate::state::AppState;

/// Rundown grid routes mounted at `/rundowns`.
///
/// ```text
/// GET  /columns                    -> get_columns
/// GET  /{kind}                     -> get_timed_rundown
/// GET  /{kind}/ordering            -> get_ordering
/// POST /{kind}/actions             -> apply_actions
/// POST /{kind}/reorder             -> reorder
/// GET  /{kind}/duplicates          -> list_duplicates
/// GET  /{kind}/stage-requirements  -> get_stage_requirements
/// GET  /{kind}/applicants          -> get_applicant_view
/// GET  /{kind}/performance-details -> get_performance_detail_view
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/columns", get(rundown::get_columns))
        .route("/{kind}", get(rundown::get_timed_rundown))
        .route("/{kind}/ordering", get(rundown::get_ordering))
        .route("/{kind}/actions", post(rundown::apply_actions))
        .route("/{kind}/reorder", post(rundown::reorder))
        .route("/{kind}/duplicates", get(rundown::list_duplicates))
        .route(
            "/{kind}/stage-requirements",
            get(rundown::get_stage_requirements),
        )
        .route("/{kind}/applicants", get(rundown::get_applicant_view))
        .route(
            "/{kind}/performance-details",
            get(rundown::get_performance_detail_view),
        )
}
