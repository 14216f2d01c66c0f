use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use super::KeyValueStore;
use crate::error::AppResult;

/// Directory-backed store, one JSON file per key
///
/// Writes go to a temp file that is flushed to disk and then renamed over
/// the target, so a reader sees either the old value or the new one, even
/// after a crash.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let target = self.path_for(key);
        let tmp = target.with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(value.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = tokio::fs::rename(&tmp, &target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::debug!(path = %target.display(), bytes = value.len(), "Wrote preference file");
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
