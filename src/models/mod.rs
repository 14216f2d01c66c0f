use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod preference_profile;
pub mod recipe;

pub use preference_profile::PreferenceProfile;
pub use recipe::{RawRecipe, Recipe, RecipeSource, RecognitionPayload, TextField};

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Request to recognize images and rank the resulting recipes
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub image_urls: Vec<String>,
}

/// Provenance assumed for client-held recipes that do not name one
pub const CLIENT_RECIPE_SOURCE: RecipeSource = RecipeSource::Llm;

/// Request to rank recipes the client already holds
///
/// Entries stay untyped so one unreadable candidate does not reject the
/// whole list.
#[derive(Debug, Clone, Deserialize)]
pub struct RankRequest {
    pub recipes: Vec<serde_json::Value>,
}

impl RankRequest {
    pub fn into_recipes(self) -> Vec<Recipe> {
        self.recipes
            .into_iter()
            .map(|value| Recipe::from_value(value, CLIENT_RECIPE_SOURCE))
            .collect()
    }
}

/// Request recording that the user picked a recipe
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionRequest {
    pub recipe: serde_json::Value,
}

impl SelectionRequest {
    pub fn into_recipe(self) -> Recipe {
        Recipe::from_value(self.recipe, CLIENT_RECIPE_SOURCE)
    }
}

/// Best-effort ranked list handed back to the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedRecipes {
    pub recipes: Vec<Recipe>,
    /// Set when the profile could not be read or written; ranking still ran
    pub storage_warning: Option<String>,
    pub ranked_at: DateTime<Utc>,
}

impl RankedRecipes {
    pub fn new(recipes: Vec<Recipe>, storage_warning: Option<String>) -> Self {
        Self {
            recipes,
            storage_warning,
            ranked_at: Utc::now(),
        }
    }
}
