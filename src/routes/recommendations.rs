use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{RankedRecipes, RecommendationRequest},
    routes::AppState,
};

/// Handler for the recognition round-trip
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RankedRecipes>> {
    tracing::info!(
        request_id = %request_id,
        image_count = request.image_urls.len(),
        "Processing recommendation request"
    );

    let ranked = state.recommendations.recommend(request.image_urls).await?;

    tracing::info!(
        request_id = %request_id,
        recipe_count = ranked.recipes.len(),
        degraded = ranked.storage_warning.is_some(),
        "Recommendation completed"
    );

    Ok(Json(ranked))
}
