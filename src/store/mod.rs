use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{ConfigSummary, StoredConfig};

/// Typed error for "resource not found", downcast to 404 by the API error handler
#[derive(Debug)]
pub struct NotFoundError {
    pub resource: String,
    pub id: String,
}

impl NotFoundError {
    pub fn new(resource: &str, id: &str) -> Self {
        Self {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }
}

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} not found: {}", self.resource, self.id)
    }
}

impl std::error::Error for NotFoundError {}

/// Store keeps parsed configurations in memory, keyed by config id.
/// Contents do not survive a restart.
#[derive(Clone, Default)]
pub struct Store {
    configs: Arc<RwLock<HashMap<String, StoredConfig>>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, config: StoredConfig) {
        self.configs.write().await.insert(config.id.clone(), config);
    }

    pub async fn get(&self, id: &str) -> Option<StoredConfig> {
        self.configs.read().await.get(id).cloned()
    }

    /// Summaries of every stored configuration, oldest first
    pub async fn list(&self) -> Vec<ConfigSummary> {
        let configs = self.configs.read().await;
        let mut summaries: Vec<ConfigSummary> = configs.values().map(|c| c.summary()).collect();
        summaries.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.config_id.cmp(&b.config_id))
        });
        summaries
    }

    /// Remove a configuration, returning it so the caller can clean up its files
    pub async fn delete(&self, id: &str) -> Result<StoredConfig> {
        self.configs
            .write()
            .await
            .remove(id)
            .ok_or_else(|| NotFoundError::new("Configuration", id).into())
    }

    pub async fn len(&self) -> usize {
        self.configs.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use chrono::{Duration, Utc};
    use std::collections::BTreeMap;

    fn stored(id: &str, minutes_ago: i64) -> StoredConfig {
        StoredConfig {
            id: id.to_string(),
            filename: format!("{}.conf", id),
            network: parse("host-name sw1;").unwrap(),
            diagrams: BTreeMap::new(),
            markup: BTreeMap::new(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_insert_get_delete() {
        let store = Store::new();
        store.insert(stored("a", 0)).await;
        assert_eq!(store.len().await, 1);

        let got = store.get("a").await.unwrap();
        assert_eq!(got.network.devices[0].hostname, "sw1");
        assert!(store.get("missing").await.is_none());

        let removed = store.delete("a").await.unwrap();
        assert_eq!(removed.filename, "a.conf");
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_delete_missing_is_typed_not_found() {
        let store = Store::new();
        let err = store.delete("nope").await.unwrap_err();
        let nf = err.downcast_ref::<NotFoundError>().unwrap();
        assert_eq!(nf.id, "nope");
        assert_eq!(err.to_string(), "Configuration not found: nope");
    }

    #[tokio::test]
    async fn test_list_oldest_first() {
        let store = Store::new();
        store.insert(stored("new", 1)).await;
        store.insert(stored("old", 10)).await;
        let ids: Vec<String> = store.list().await.into_iter().map(|s| s.config_id).collect();
        assert_eq!(ids, vec!["old", "new"]);
    }

    #[tokio::test]
    async fn test_clones_share_contents() {
        let store = Store::new();
        let handle = store.clone();
        handle.insert(stored("shared", 0)).await;
        assert!(store.get("shared").await.is_some());
    }
}
