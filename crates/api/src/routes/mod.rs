pub mod health;
pub mod performance;
pub mod rundown;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /performances                                list
/// /performances/options                        dropdown options
/// /performances/actions                        batch of actions (POST)
///
/// /rundowns/{kind}                             timed rundown
/// /rundowns/{kind}/ordering                    canonical ordering
/// /rundowns/{kind}/actions                     batch of actions (POST)
/// /rundowns/{kind}/reorder                     reorder (POST)
/// /rundowns/{kind}/duplicates                  duplicate performance references
/// /rundowns/{kind}/stage-requirements          stage crew view
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/performances", performance::router())
        .nest("/rundowns", rundown::router())
}
