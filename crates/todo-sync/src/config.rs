//! Client configuration
//!
//! Read from a JSON document embedded in the host page; every field has a
//! default so a partial or missing document still yields a usable config.

use serde::{Deserialize, Serialize};

const FALLBACK_ENDPOINT: &str = "http://localhost:8000/graphql";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    /// GraphQL endpoint the client posts to
    pub endpoint: String,
    /// Re-run the list query after every successful mutation
    pub refetch_after_mutation: bool,
    /// Maximum log level: "error", "warn", "info", "debug" or "trace"
    pub log_level: String,
    /// How long a notification stays on screen
    pub notice_timeout_ms: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            refetch_after_mutation: true,
            log_level: "info".to_string(),
            notice_timeout_ms: 4000,
        }
    }
}

/// Compile-time `TODO_GRAPHQL_ENDPOINT`, falling back to the local dev server
fn default_endpoint() -> String {
    option_env!("TODO_GRAPHQL_ENDPOINT")
        .unwrap_or(FALLBACK_ENDPOINT)
        .to_string()
}

impl SyncConfig {
    /// Parse a JSON config document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: SyncConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        let endpoint = self.endpoint.trim();
        self.endpoint = if endpoint.is_empty() { default_endpoint() } else { endpoint.to_string() };
        self.log_level = self.log_level.trim().to_ascii_lowercase();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = SyncConfig::from_json(r#"{"endpoint":"https://todo.example/graphql"}"#).unwrap();
        assert_eq!(config.endpoint, "https://todo.example/graphql");
        assert!(config.refetch_after_mutation);
        assert_eq!(config.notice_timeout_ms, 4000);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_blank_endpoint_falls_back() {
        let config = SyncConfig::from_json(r#"{"endpoint":"  ","refetchAfterMutation":false,"logLevel":"DEBUG"}"#).unwrap();
        assert_eq!(config.endpoint, SyncConfig::default().endpoint);
        assert!(!config.refetch_after_mutation);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(SyncConfig::from_json("{not json").is_err());
    }
}
