use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{PreferenceProfile, SelectionRequest},
    routes::AppState,
};

/// Returns the stored preference profile
pub async fn get_profile(State(state): State<Arc<AppState>>) -> AppResult<Json<PreferenceProfile>> {
    let profile = state.preferences.get_profile().await?;
    Ok(Json(profile))
}

/// Clears the preference profile
pub async fn clear(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<StatusCode> {
    state.preferences.clear().await?;
    tracing::info!(request_id = %request_id, "Preferences reset by user");
    Ok(StatusCode::NO_CONTENT)
}

/// Records that the user accepted a recipe
pub async fn select(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectionRequest>,
) -> AppResult<StatusCode> {
    state.recommendations.select(&request.into_recipe()).await?;
    Ok(StatusCode::NO_CONTENT)
}
