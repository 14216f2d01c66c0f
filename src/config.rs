use serde::Deserialize;

/// Which durable backend holds the preference profile
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// In-process map, lost on restart
    Memory,
    /// One JSON file per key under `preferences_dir`
    File,
    /// Redis instance at `redis_url`
    Redis,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Storage backend for the preference profile
    #[serde(default = "default_storage_backend")]
    pub storage_backend: StorageBackend,

    /// Directory used by the file backend
    #[serde(default = "default_preferences_dir")]
    pub preferences_dir: String,

    /// Redis connection URL, used by the redis backend
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Key the whole profile is stored under
    #[serde(default = "default_preferences_key")]
    pub preferences_key: String,

    /// Base URL of the recognition backend
    #[serde(default = "default_recognition_api_url")]
    pub recognition_api_url: String,

    /// Request timeout for the recognition backend, in seconds
    #[serde(default = "default_recognition_timeout_secs")]
    pub recognition_timeout_secs: u64,

    /// Whether a recognition round feeds its own keywords into the profile
    #[serde(default = "default_record_on_recognition")]
    pub record_on_recognition: bool,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_storage_backend() -> StorageBackend {
    StorageBackend::File
}

fn default_preferences_dir() -> String {
    "./data".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_preferences_key() -> String {
    "userPreferences".to_string()
}

fn default_recognition_api_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_recognition_timeout_secs() -> u64 {
    60
}

fn default_record_on_recognition() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
