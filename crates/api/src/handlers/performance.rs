//! Handlers for the performance grid.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use concert_core::action::DataAction;
use concert_core::reconcile::Reconciler;
use concert_core::store::RecordStore;
use concert_core::views;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::validate_request;
use crate::response::DataResponse;
use crate::state::AppState;

/// A batch of grid actions, applied in order.
#[derive(Debug, Deserialize, Validate)]
pub struct BatchRequest {
    #[validate(length(min = 1, max = 500))]
    pub actions: Vec<DataAction>,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/performances
pub async fn list_performances(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let performances = state.performance_store().fetch_all().await?;
    Ok(Json(DataResponse { data: performances }))
}

/// GET /api/v1/performances/options
///
/// Entries for the performance dropdown of the rundown grids.
pub async fn list_performance_options(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let options = views::load_performance_options(&state.performance_store()).await?;
    Ok(Json(DataResponse { data: options }))
}

/// GET /api/v1/performances/preferences
///
/// Concert and rehearsal availability of every applicant.
pub async fn list_preferences(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = views::load_preference_view(&state.performance_store()).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/performances/columns
pub async fn get_columns(State(state): State<AppState>) -> impl IntoResponse {
    Json(DataResponse {
        data: state.performance_columns.schema(),
    })
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// POST /api/v1/performances/actions
///
/// Apply create/update/delete actions. Performances have no ordering, so a
/// batch containing a reorder is rejected as a whole.
pub async fn apply_actions(
    State(state): State<AppState>,
    Json(input): Json<BatchRequest>,
) -> AppResult<impl IntoResponse> {
    validate_request(&input)?;
    if input.actions.iter().any(DataAction::is_reorder) {
        return Err(AppError::BadRequest(
            "Performances cannot be reordered".to_string(),
        ));
    }

    let store = state.performance_store();
    let reconciler = Reconciler::new(
        &store,
        state.performance_columns.as_ref(),
        state.reconcile_options(),
    );
    let result = reconciler.apply_batch(input.actions).await;

    tracing::info!(
        success = result.success,
        actions = result.results.len(),
        "Performance actions applied",
    );

    Ok(Json(DataResponse { data: result }))
}
