use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    models::{RankRequest, RankedRecipes},
    routes::AppState,
};

/// Handler ranking recipes already held by the client
pub async fn rank(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RankRequest>,
) -> Json<RankedRecipes> {
    Json(state.recommendations.rank_candidates(request.into_recipes()).await)
}
