//! Connection parameters for the hosted store client.

use serde::Deserialize;

/// Named connection parameters, supplied at deploy time. All optional so a
/// partially configured environment can still construct the type; use
/// [`StoreConfig::missing_keys`] (or a `ConfigGatedStore`) to find out
/// whether the required trio is present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
}

impl StoreConfig {
    /// Read `CLUBDESK_*` environment variables. Absent variables stay `None`.
    pub fn from_env() -> Self {
        Self {
            api_key: env_var("CLUBDESK_API_KEY"),
            auth_domain: env_var("CLUBDESK_AUTH_DOMAIN"),
            project_id: env_var("CLUBDESK_PROJECT_ID"),
            storage_bucket: env_var("CLUBDESK_STORAGE_BUCKET"),
            messaging_sender_id: env_var("CLUBDESK_MESSAGING_SENDER_ID"),
            app_id: env_var("CLUBDESK_APP_ID"),
        }
    }

    /// The required parameters that are missing. Empty means the config can
    /// build a store client.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.is_none() {
            missing.push("api_key");
        }
        if self.project_id.is_none() {
            missing.push("project_id");
        }
        if self.app_id.is_none() {
            missing.push("app_id");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_keys().is_empty()
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
