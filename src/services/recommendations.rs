use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{PreferenceProfile, RankedRecipes, Recipe},
    services::{
        keywords::{extract_keywords, extract_keywords_for_many, tag_recipes},
        preferences::PreferenceStore,
        ranking::rank,
        recognition::RecognitionProvider,
    },
};

/// Runs a recognition round-trip and ranks its recipes by learned preference
///
/// Order within a round: recognize, tag, record the batch keywords, re-read
/// the profile, rank. Recording completes before the profile used for
/// ranking is read, so a round reinforces its own keywords.
pub struct RecommendationService {
    provider: Arc<dyn RecognitionProvider>,
    preferences: Arc<PreferenceStore>,
    record_on_recognition: bool,
}

impl RecommendationService {
    pub fn new(
        provider: Arc<dyn RecognitionProvider>,
        preferences: Arc<PreferenceStore>,
        record_on_recognition: bool,
    ) -> Self {
        Self {
            provider,
            preferences,
            record_on_recognition,
        }
    }

    /// Recognizes the images and returns the proposed recipes, ranked
    ///
    /// Storage trouble never fails the call; it is reported through
    /// `storage_warning` instead.
    pub async fn recommend(&self, image_urls: Vec<String>) -> AppResult<RankedRecipes> {
        let image_urls: Vec<String> = image_urls
            .into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();

        if image_urls.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one image URL is required".to_string(),
            ));
        }

        let mut warning = None;

        let current = self.profile_or_empty(&mut warning).await;
        let mut recipes = self.provider.recognize(&image_urls, &current).await?;

        tracing::info!(
            provider = self.provider.name(),
            recipe_count = recipes.len(),
            "Ranking recognized recipes"
        );

        tag_recipes(&mut recipes);

        if self.record_on_recognition {
            let batch = extract_keywords_for_many(&recipes);
            if let Err(e) = self.preferences.record_keywords(batch).await {
                tracing::warn!(error = %e, "Could not record recognized keywords");
                warning.get_or_insert_with(|| e.to_string());
            }
        }

        Ok(self.rank_against_store(recipes, warning).await)
    }

    /// Tags and ranks recipes the caller already holds, without recording
    pub async fn rank_candidates(&self, mut recipes: Vec<Recipe>) -> RankedRecipes {
        tag_recipes(&mut recipes);
        self.rank_against_store(recipes, None).await
    }

    /// Records that the user accepted a recipe
    pub async fn select(&self, recipe: &Recipe) -> AppResult<()> {
        let keywords = match &recipe.keywords {
            Some(keywords) => keywords.clone(),
            None => extract_keywords(recipe),
        };

        tracing::info!(
            recipe = %recipe.display_name(),
            keyword_count = keywords.len(),
            "Recording recipe selection"
        );

        self.preferences.record_keywords(keywords).await
    }

    async fn rank_against_store(
        &self,
        recipes: Vec<Recipe>,
        mut warning: Option<String>,
    ) -> RankedRecipes {
        match self.preferences.get_profile().await {
            Ok(profile) => RankedRecipes::new(rank(recipes, &profile), warning),
            Err(e) => {
                tracing::warn!(error = %e, "Preference profile unavailable, returning recipes unranked");
                warning.get_or_insert_with(|| e.to_string());
                RankedRecipes::new(recipes, warning)
            }
        }
    }

    async fn profile_or_empty(&self, warning: &mut Option<String>) -> PreferenceProfile {
        self.preferences.get_profile().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Sending empty preferences to recognition");
            warning.get_or_insert_with(|| e.to_string());
            PreferenceProfile::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, MockKeyValueStore};
    use crate::models::RecipeSource;
    use std::sync::Mutex;

    /// Provider returning a fixed batch and remembering what it was sent
    struct FixedProvider {
        recipes: Vec<Recipe>,
        seen_preferences: Mutex<Vec<PreferenceProfile>>,
    }

    impl FixedProvider {
        fn new(recipes: Vec<Recipe>) -> Self {
            Self {
                recipes,
                seen_preferences: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl RecognitionProvider for FixedProvider {
        async fn recognize(
            &self,
            _image_urls: &[String],
            preferences: &PreferenceProfile,
        ) -> AppResult<Vec<Recipe>> {
            self.seen_preferences.lock().unwrap().push(preferences.clone());
            Ok(self.recipes.clone())
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn recipe(name: &str, ingredients: &[&str]) -> Recipe {
        Recipe::new(
            name,
            ingredients.iter().map(|s| s.to_string()).collect(),
            Vec::new(),
            RecipeSource::Llm,
        )
    }

    fn service(
        recipes: Vec<Recipe>,
        record: bool,
    ) -> (Arc<FixedProvider>, Arc<PreferenceStore>, RecommendationService) {
        let provider = Arc::new(FixedProvider::new(recipes));
        let store = Arc::new(PreferenceStore::new(Arc::new(MemoryStore::new())));
        let service = RecommendationService::new(provider.clone(), store.clone(), record);
        (provider, store, service)
    }

    #[tokio::test]
    async fn test_rejects_empty_image_list() {
        let (_, _, service) = service(Vec::new(), true);
        let result = service.recommend(vec!["  ".to_string()]).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_round_records_batch_before_ranking() {
        let (_, store, service) = service(
            vec![recipe("Rice", &["rice"]), recipe("Tomato Salad", &["tomato"])],
            true,
        );
        store.record_keywords(["tomato"]).await.unwrap();

        let ranked = service.recommend(vec!["https://img/1.jpg".to_string()]).await.unwrap();

        assert!(ranked.storage_warning.is_none());
        assert_eq!(ranked.recipes[0].display_name(), "Tomato Salad");
        // tomato: 1 prior + 1 from this batch; salad: 1 from this batch
        assert_eq!(ranked.recipes[0].weight, 3);
        assert_eq!(ranked.recipes[1].weight, 1);

        let profile = store.get_profile().await.unwrap();
        assert_eq!(profile.count("tomato"), 2);
        assert_eq!(profile.count("rice"), 1);
    }

    #[tokio::test]
    async fn test_batch_keywords_counted_once_per_round() {
        let (_, store, service) = service(
            vec![recipe("Tomato Soup", &["tomato"]), recipe("Tomato Pie", &["tomato"])],
            true,
        );

        service.recommend(vec!["a".to_string()]).await.unwrap();
        assert_eq!(store.get_profile().await.unwrap().count("tomato"), 1);
    }

    #[tokio::test]
    async fn test_recording_can_be_disabled() {
        let (_, store, service) = service(vec![recipe("Rice", &["rice"])], false);

        let ranked = service.recommend(vec!["a".to_string()]).await.unwrap();
        assert_eq!(ranked.recipes[0].weight, 0);
        assert!(store.get_profile().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_current_profile_is_sent_to_provider() {
        let (provider, store, service) = service(vec![recipe("Rice", &["rice"])], true);
        store.record_keywords(["basil"]).await.unwrap();

        service.recommend(vec!["a".to_string()]).await.unwrap();

        let seen = provider.seen_preferences.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].count("basil"), 1);
        assert_eq!(seen[0].count("rice"), 0);
    }

    #[tokio::test]
    async fn test_unavailable_storage_still_returns_recipes() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get()
            .returning(|_| Err(AppError::StorageUnavailable("offline".to_string())));
        mock.expect_set().never();

        let provider = Arc::new(FixedProvider::new(vec![
            recipe("First", &["x"]),
            recipe("Second", &["y"]),
        ]));
        let store = Arc::new(PreferenceStore::new(Arc::new(mock)));
        let service = RecommendationService::new(provider, store, true);

        let ranked = service.recommend(vec!["a".to_string()]).await.unwrap();
        assert_eq!(ranked.recipes.len(), 2);
        assert_eq!(ranked.recipes[0].display_name(), "First");
        assert!(ranked.storage_warning.unwrap().contains("offline"));
    }

    #[tokio::test]
    async fn test_rank_candidates_does_not_record() {
        let (_, store, service) = service(Vec::new(), true);
        store.record_keywords(["pesto"]).await.unwrap();

        let ranked = service
            .rank_candidates(vec![recipe("Plain", &["rice"]), recipe("Pesto", &["basil"])])
            .await;

        assert_eq!(ranked.recipes[0].display_name(), "Pesto");
        assert_eq!(store.get_profile().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_select_records_extracted_keywords() {
        let (_, store, service) = service(Vec::new(), true);
        let chosen = recipe("Basil Pesto", &["basil", "pine nuts"]);

        service.select(&chosen).await.unwrap();

        let profile = store.get_profile().await.unwrap();
        for keyword in extract_keywords(&chosen) {
            assert!(profile.count(&keyword) >= 1, "missing {}", keyword);
        }
    }

    #[tokio::test]
    async fn test_select_prefers_existing_keywords() {
        let (_, store, service) = service(Vec::new(), true);
        let chosen = recipe("Basil Pesto", &["basil"]).with_keywords(["italian"]);

        service.select(&chosen).await.unwrap();

        let profile = store.get_profile().await.unwrap();
        assert_eq!(profile.count("italian"), 1);
        assert_eq!(profile.count("basil"), 0);
    }
}
