//! Provider function configuration.

use std::time::Duration;

use serde::Deserialize;
use tripsync_client::ProviderClientConfig;

/// Where the provider functions live and how hard to try them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Functions base URL. Empty disables the providers.
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: usize,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            timeout_secs: 60,
            max_retries: 3,
        }
    }
}

impl ProvidersConfig {
    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty()
    }

    pub fn client_config(&self) -> ProviderClientConfig {
        let mut config = ProviderClientConfig::default()
            .with_base_url(self.base_url.trim())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_max_retries(self.max_retries);
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key.clone());
        }
        config
    }
}
