//! Request handlers.
//!
//! Each submodule provides async handler functions for one grid. Handlers
//! build a store for the requested collection, delegate to the
//! reconciliation usecases or read views in `concert_core`, and map errors
//! via [`AppError`](crate::error::AppError).

pub mod performance;
pub mod rundown;

use validator::Validate;

use crate::error::{AppError, AppResult};

/// Run `validator` rules on a request body, turning failures into a 400.
pub(crate) fn validate_request<T: Validate>(input: &T) -> AppResult<()> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}
