use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    db::KeyValueStore,
    error::{AppError, AppResult},
    models::PreferenceProfile,
};

/// Default key the profile is stored under
pub const PREFERENCES_KEY: &str = "userPreferences";

/// Durable, frequency-weighted record of what the user has shown interest in
///
/// The whole profile is one JSON object under a single storage key. Updates
/// read, modify and write that object while holding `write_guard`, and run
/// in their own task: once started, an update finishes even if the caller
/// stops waiting for it.
pub struct PreferenceStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    write_guard: Arc<Mutex<()>>,
}

impl PreferenceStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(storage, PREFERENCES_KEY)
    }

    pub fn with_key(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            write_guard: Arc::new(Mutex::new(())),
        }
    }

    /// Adds one occurrence for every keyword, repeats included
    pub async fn record_keywords<I, S>(&self, keywords: I) -> AppResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
        if keywords.is_empty() {
            return Ok(());
        }

        let storage = self.storage.clone();
        let key = self.key.clone();
        let guard = self.write_guard.clone();

        let update = tokio::spawn(async move {
            let _held = guard.lock_owned().await;

            let mut profile = match load(storage.as_ref(), &key).await {
                Ok(profile) => profile,
                Err(AppError::MalformedProfile(reason)) => {
                    tracing::warn!(key = %key, reason = %reason, "Replacing corrupt preference profile");
                    PreferenceProfile::new()
                }
                Err(e) => return Err(e),
            };

            profile.record(&keywords);
            save(storage.as_ref(), &key, &profile).await?;

            tracing::debug!(
                recorded = keywords.len(),
                distinct = profile.len(),
                "Preference profile updated"
            );
            Ok::<(), AppError>(())
        });

        update
            .await
            .map_err(|e| AppError::Internal(format!("Preference update task failed: {}", e)))?
    }

    /// Current profile; empty when nothing was ever recorded
    ///
    /// A stored value that fails to parse is treated as empty. Storage
    /// failures are returned as `StorageUnavailable`.
    pub async fn get_profile(&self) -> AppResult<PreferenceProfile> {
        match load(self.storage.as_ref(), &self.key).await {
            Err(AppError::MalformedProfile(reason)) => {
                tracing::warn!(key = %self.key, reason = %reason, "Ignoring corrupt preference profile");
                Ok(PreferenceProfile::new())
            }
            other => other,
        }
    }

    /// Removes every entry at once
    pub async fn clear(&self) -> AppResult<()> {
        let storage = self.storage.clone();
        let key = self.key.clone();
        let guard = self.write_guard.clone();

        let removal = tokio::spawn(async move {
            let _held = guard.lock_owned().await;
            storage.remove(&key).await
        });

        removal
            .await
            .map_err(|e| AppError::Internal(format!("Preference clear task failed: {}", e)))??;

        tracing::info!(key = %self.key, "Preference profile cleared");
        Ok(())
    }
}

async fn load(storage: &dyn KeyValueStore, key: &str) -> AppResult<PreferenceProfile> {
    match storage.get(key).await? {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| AppError::MalformedProfile(e.to_string())),
        None => Ok(PreferenceProfile::new()),
    }
}

async fn save(storage: &dyn KeyValueStore, key: &str, profile: &PreferenceProfile) -> AppResult<()> {
    let json = serde_json::to_string(profile)
        .map_err(|e| AppError::Internal(format!("Profile serialization error: {}", e)))?;
    storage.set(key, &json).await
}
