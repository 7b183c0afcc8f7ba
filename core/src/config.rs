use serde::{Deserialize, Serialize};

pub const DEFAULT_CALCULATION_CAPACITY: usize = 1000;
pub const DEFAULT_EXPORT_CAPACITY: usize = 500;
pub const DEFAULT_API_BASE_URL: &str = "https://api.investwisepro.com";
pub const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite path, or ":memory:".
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default = "default_calculation_capacity")]
    pub calculation_capacity: usize,
    #[serde(default = "default_export_capacity")]
    pub export_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub api:     ApiConfig,
}

impl AppConfig {
    /// Load from the data/ directory.
    /// In tests, use AppConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let storage_path = format!("{data_dir}/storage.json");
        let storage_content = std::fs::read_to_string(&storage_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {storage_path}: {e}"))?;
        let storage: StorageConfig = serde_json::from_str(&storage_content)?;

        let api_path = format!("{data_dir}/api.json");
        let api_content = std::fs::read_to_string(&api_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {api_path}: {e}"))?;
        let api: ApiConfig = serde_json::from_str(&api_content)?;

        let config = Self { storage, api };
        config.validate()?;
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            storage: StorageConfig {
                db_path: ":memory:".into(),
                calculation_capacity: DEFAULT_CALCULATION_CAPACITY,
                export_capacity: DEFAULT_EXPORT_CAPACITY,
            },
            api: ApiConfig {
                base_url: "http://127.0.0.1:9".into(),
                api_key: Some("iw_test_key".into()),
                timeout_ms: 2_000,
            },
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.storage.calculation_capacity == 0 || self.storage.export_capacity == 0 {
            anyhow::bail!("ledger capacities must be at least 1");
        }
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("api.base_url must not be empty");
        }
        if self.api.timeout_ms == 0 {
            anyhow::bail!("api.timeout_ms must be at least 1");
        }
        Ok(())
    }
}

fn default_db_path() -> String {
    ":memory:".into()
}

fn default_calculation_capacity() -> usize {
    DEFAULT_CALCULATION_CAPACITY
}

fn default_export_capacity() -> usize {
    DEFAULT_EXPORT_CAPACITY
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.into()
}

fn default_api_timeout_ms() -> u64 {
    DEFAULT_API_TIMEOUT_MS
}
