use crate::{
    error::{AppError, AppResult},
    models::{PreferenceProfile, Recipe},
    services::preferences::PreferenceStore,
};

/// Sum of the profile counts of a recipe's keywords
///
/// Fails with `MalformedRecipe` when the recipe has no keyword set or the
/// sum does not fit.
pub fn recipe_weight(recipe: &Recipe, profile: &PreferenceProfile) -> AppResult<u64> {
    let keywords = recipe.keywords.as_ref().ok_or_else(|| {
        AppError::MalformedRecipe(format!("{} has no keywords", recipe.display_name()))
    })?;

    keywords.iter().try_fold(0u64, |total, keyword| {
        total.checked_add(profile.count(keyword)).ok_or_else(|| {
            AppError::MalformedRecipe(format!("{} weight overflows", recipe.display_name()))
        })
    })
}

/// Orders recipes by preference weight, heaviest first
///
/// Every recipe gets its `weight` set. The sort is stable, so recipes with
/// equal weight keep their input order. A recipe that cannot be weighed
/// stays in the list with weight 0.
pub fn rank(recipes: Vec<Recipe>, profile: &PreferenceProfile) -> Vec<Recipe> {
    let mut weighted: Vec<Recipe> = recipes
        .into_iter()
        .map(|mut recipe| {
            recipe.weight = recipe_weight(&recipe, profile).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Ranking recipe with zero weight");
                0
            });
            recipe
        })
        .collect();

    weighted.sort_by(|a, b| b.weight.cmp(&a.weight));
    weighted
}

/// Ranks against the stored profile
///
/// When the profile cannot be read at all the input comes back unmodified.
pub async fn rank_with_store(recipes: Vec<Recipe>, store: &PreferenceStore) -> Vec<Recipe> {
    match store.get_profile().await {
        Ok(profile) => rank(recipes, &profile),
        Err(e) => {
            tracing::warn!(error = %e, "Preference profile unavailable, leaving recipes unranked");
            recipes
        }
    }
}
