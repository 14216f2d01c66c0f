//! Food recognition backends
//!
//! A provider takes image references, runs them through the remote
//! recognition model and returns candidate recipes already normalized to the
//! canonical `Recipe` shape. The current profile travels along so the
//! backend can apply its own ordering; the final ranking still happens
//! locally.

use crate::{
    error::AppResult,
    models::{PreferenceProfile, Recipe},
};

pub mod http;

pub use http::HttpRecognitionProvider;

/// Trait for recognition backends
#[async_trait::async_trait]
pub trait RecognitionProvider: Send + Sync {
    /// Recognizes the ingredients in the images and proposes recipes
    async fn recognize(
        &self,
        image_urls: &[String],
        preferences: &PreferenceProfile,
    ) -> AppResult<Vec<Recipe>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
