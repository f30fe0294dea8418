//! Handlers for the concert and rehearsal rundown grids.
//!
//! Every route is parameterized by `{kind}` (`concert` or `rehearsal`);
//! the two rundowns are separate collections with independent orderings.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use concert_core::ordering::OrderingChange;
use concert_core::reconcile::Reconciler;
use concert_core::rundown::RundownKind;
use concert_core::types::DbId;
use concert_core::views;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::performance::BatchRequest;
use crate::handlers::validate_request;
use crate::response::DataResponse;
use crate::state::AppState;

/// A client's proposed reordering of one rundown.
#[derive(Debug, Deserialize, Validate)]
pub struct ReorderRequest {
    #[validate(length(max = 10000))]
    pub old_ordering: Vec<DbId>,
    #[validate(length(max = 10000))]
    pub new_ordering: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// GET /api/v1/rundowns/{kind}
///
/// All slots in rundown order with computed start and end times.
pub async fn get_timed_rundown(
    State(state): State<AppState>,
    Path(kind): Path<RundownKind>,
) -> AppResult<impl IntoResponse> {
    let slots = views::load_timed_rundown(&state.rundown_store(kind)).await?;
    Ok(Json(DataResponse { data: slots }))
}

/// GET /api/v1/rundowns/{kind}/ordering
///
/// The canonical id sequence. Non-dense order numbers are repaired first.
pub async fn get_ordering(
    State(state): State<AppState>,
    Path(kind): Path<RundownKind>,
) -> AppResult<impl IntoResponse> {
    let store = state.rundown_store(kind);
    let reconciler = Reconciler::new(
        &store,
        state.rundown_columns.as_ref(),
        state.reconcile_options(),
    );
    let ordering = reconciler.canonical_ordering().await?;
    Ok(Json(DataResponse { data: ordering }))
}

/// GET /api/v1/rundowns/{kind}/duplicates
///
/// Performances referenced by more than one slot. Reported only; such
/// references are never blocked.
pub async fn list_duplicates(
    State(state): State<AppState>,
    Path(kind): Path<RundownKind>,
) -> AppResult<impl IntoResponse> {
    let duplicates = views::load_duplicate_references(&state.rundown_store(kind)).await?;
    Ok(Json(DataResponse { data: duplicates }))
}

/// GET /api/v1/rundowns/{kind}/applicants
///
/// Each slot's time with the contact details of its applicant.
pub async fn get_applicant_view(
    State(state): State<AppState>,
    Path(kind): Path<RundownKind>,
) -> AppResult<impl IntoResponse> {
    let rows =
        views::load_applicant_view(&state.rundown_store(kind), &state.performance_store()).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/rundowns/{kind}/performance-details
///
/// Each slot's time with the programme notes of its performance.
pub async fn get_performance_detail_view(
    State(state): State<AppState>,
    Path(kind): Path<RundownKind>,
) -> AppResult<impl IntoResponse> {
    let rows = views::load_performance_detail_view(
        &state.rundown_store(kind),
        &state.performance_store(),
    )
    .await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/rundowns/columns
///
/// Both rundown kinds share one column layout.
pub async fn get_columns(State(state): State<AppState>) -> impl IntoResponse {
    Json(DataResponse {
        data: state.rundown_columns.schema(),
    })
}

/// GET /api/v1/rundowns/{kind}/stage-requirements
pub async fn get_stage_requirements(
    State(state): State<AppState>,
    Path(kind): Path<RundownKind>,
) -> AppResult<impl IntoResponse> {
    let rows = views::load_stage_requirements(&state.rundown_store(kind)).await?;
    Ok(Json(DataResponse { data: rows }))
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// POST /api/v1/rundowns/{kind}/actions
pub async fn apply_actions(
    State(state): State<AppState>,
    Path(kind): Path<RundownKind>,
    Json(input): Json<BatchRequest>,
) -> AppResult<impl IntoResponse> {
    validate_request(&input)?;

    let store = state.rundown_store(kind);
    let reconciler = Reconciler::new(
        &store,
        state.rundown_columns.as_ref(),
        state.reconcile_options(),
    );
    let result = reconciler.apply_ordered_batch(input.actions).await;

    tracing::info!(
        %kind,
        success = result.success,
        actions = result.results.len(),
        "Rundown actions applied",
    );

    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/rundowns/{kind}/reorder
pub async fn reorder(
    State(state): State<AppState>,
    Path(kind): Path<RundownKind>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<impl IntoResponse> {
    validate_request(&input)?;

    let store = state.rundown_store(kind);
    let reconciler = Reconciler::new(
        &store,
        state.rundown_columns.as_ref(),
        state.reconcile_options(),
    );
    let change = OrderingChange {
        old_ordering: input.old_ordering,
        new_ordering: input.new_ordering,
    };
    let result = reconciler.reorder(&change).await;

    tracing::info!(%kind, success = result.success, "Rundown reorder reconciled");

    Ok(Json(DataResponse { data: result }))
}
