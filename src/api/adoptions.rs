//! Adoption listing endpoints.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::AdoptionRecord;
use crate::AppState;

/// GET /api/admin/adoptions - List all adoption records, newest first.
///
/// Records for pets later reverted to available are included; they are the
/// only history of past adoptions.
pub async fn list_adoptions(State(state): State<AppState>) -> ApiResult<Vec<AdoptionRecord>> {
    let adoptions = state.repo.list_adoptions().await?;
    success(adoptions)
}
