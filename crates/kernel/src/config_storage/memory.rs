//! In-memory implementation of GroupStorage.

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;

use super::{GroupFilter, GroupStorage, SaveStatus};
use crate::models::MenuLinkGroup;

/// Groups held in a map keyed by id.
#[derive(Debug, Default)]
pub struct MemoryGroupStorage {
    groups: RwLock<BTreeMap<String, MenuLinkGroup>>,
}

impl MemoryGroupStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-filled with groups.
    pub fn with_groups(groups: impl IntoIterator<Item = MenuLinkGroup>) -> Self {
        let groups = groups.into_iter().map(|g| (g.id.clone(), g)).collect();
        Self {
            groups: RwLock::new(groups),
        }
    }

    /// Number of stored groups.
    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    /// Whether no groups are stored.
    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}

#[async_trait]
impl GroupStorage for MemoryGroupStorage {
    async fn load(&self, id: &str) -> Result<Option<MenuLinkGroup>> {
        Ok(self.groups.read().get(id).cloned())
    }

    async fn save(&self, group: &MenuLinkGroup) -> Result<SaveStatus> {
        let previous = self.groups.write().insert(group.id.clone(), group.clone());
        Ok(match previous {
            Some(_) => SaveStatus::Updated,
            None => SaveStatus::New,
        })
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.groups.write().remove(id).is_some())
    }

    async fn list(&self, filter: Option<&GroupFilter>) -> Result<Vec<MenuLinkGroup>> {
        let groups: Vec<MenuLinkGroup> = self.groups.read().values().cloned().collect();
        Ok(match filter {
            Some(f) => f.apply(groups),
            None => groups,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_reports_new_then_updated() {
        let storage = MemoryGroupStorage::new();
        let group = MenuLinkGroup::new("g", "G").parent("admin:system.admin");

        assert_eq!(storage.save(&group).await.unwrap(), SaveStatus::New);
        assert_eq!(
            storage.save(&group.clone().weight(4)).await.unwrap(),
            SaveStatus::Updated
        );

        let loaded = storage.load("g").await.unwrap().unwrap();
        assert_eq!(loaded.weight, 4);
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn exists_and_delete() {
        let storage = MemoryGroupStorage::with_groups([MenuLinkGroup::new("g", "G")]);

        assert!(storage.exists("g").await.unwrap());
        assert!(!storage.exists("other").await.unwrap());

        assert!(storage.delete("g").await.unwrap());
        assert!(!storage.delete("g").await.unwrap());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn load_enabled_in_id_order() {
        let storage = MemoryGroupStorage::with_groups([
            MenuLinkGroup::new("zeta", "Z"),
            MenuLinkGroup::new("alpha", "A"),
            MenuLinkGroup::new("mid", "M").disabled(),
        ]);

        let enabled = storage.load_enabled().await.unwrap();
        let ids: Vec<_> = enabled.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }
}
