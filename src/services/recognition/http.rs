/// HTTP recognition backend
///
/// API Flow:
/// 1. POST /recommend with `{ "imageUrls": [...], "preferences": {...} }`
/// 2. Response `{ "llm": [...], "db": [...] }`, each a list of recipe objects
///    whose fields may be lists or single strings
use reqwest::Client as HttpClient;
use serde::Serialize;
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    models::{PreferenceProfile, Recipe, RecognitionPayload},
    services::recognition::RecognitionProvider,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecommendBody<'a> {
    image_urls: &'a [String],
    preferences: &'a PreferenceProfile,
}

#[derive(Clone)]
pub struct HttpRecognitionProvider {
    http_client: HttpClient,
    api_url: String,
}

impl HttpRecognitionProvider {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn recommend_url(&self) -> String {
        format!("{}/recommend", self.api_url)
    }
}

#[async_trait::async_trait]
impl RecognitionProvider for HttpRecognitionProvider {
    async fn recognize(
        &self,
        image_urls: &[String],
        preferences: &PreferenceProfile,
    ) -> AppResult<Vec<Recipe>> {
        let response = self
            .http_client
            .post(self.recommend_url())
            .json(&RecommendBody {
                image_urls,
                preferences,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Recognition API returned status {}: {}",
                status, body
            )));
        }

        let payload: RecognitionPayload = response.json().await?;
        let recipes = payload.into_recipes();

        tracing::info!(
            image_count = image_urls.len(),
            recipe_count = recipes.len(),
            "Recognition returned recipes"
        );

        Ok(recipes)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommend_url_strips_trailing_slash() {
        let provider =
            HttpRecognitionProvider::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(provider.recommend_url(), "http://localhost:5000/recommend");
    }

    #[test]
    fn test_body_uses_backend_field_names() {
        let urls = vec!["https://img/1.jpg".to_string()];
        let profile: PreferenceProfile = [("tomato", 2)].into_iter().collect();
        let body = serde_json::to_value(RecommendBody {
            image_urls: &urls,
            preferences: &profile,
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "imageUrls": ["https://img/1.jpg"],
                "preferences": { "tomato": 2 }
            })
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        // Port 9 (discard) is not expected to accept HTTP
        let provider =
            HttpRecognitionProvider::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result = provider.recognize(&["https://img/1.jpg".to_string()], &PreferenceProfile::new()).await;
        assert!(matches!(result, Err(AppError::HttpClient(_))));
    }
}
