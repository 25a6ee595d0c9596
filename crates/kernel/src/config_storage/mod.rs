//! Configuration storage for menu link groups.
//!
//! All group reads and writes go through [`GroupStorage`], so the discovery
//! pass, the admin form and config sync never care which backend holds the
//! records.
//!
//! # Backends
//!
//! - [`MemoryGroupStorage`] - in-process map, for embedding and tests
//! - [`FileGroupStorage`] - active config directory, one YAML file per group
//!
//! # Usage
//!
//! ```ignore
//! // Load one group
//! let group = storage.load("localgov_menu_link_group_content").await?;
//!
//! // Every enabled group, in id order
//! let groups = storage.load_enabled().await?;
//! ```

mod file;
mod memory;
pub mod yaml;

use anyhow::Result;
use async_trait::async_trait;

pub use file::FileGroupStorage;
pub use memory::MemoryGroupStorage;

use crate::models::MenuLinkGroup;

/// Outcome of a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// The group did not exist before.
    New,
    /// An existing group was overwritten.
    Updated,
}

/// Filter criteria for listing groups.
#[derive(Debug, Clone, Default)]
pub struct GroupFilter {
    /// Only groups with this status.
    pub status: Option<bool>,

    /// Maximum number of results.
    pub limit: Option<usize>,

    /// Number of results to skip.
    pub offset: Option<usize>,
}

impl GroupFilter {
    /// Create a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by status.
    pub fn with_status(mut self, status: bool) -> Self {
        self.status = Some(status);
        self
    }

    /// Limit results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip results.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Apply the filter to groups already sorted by id.
    pub fn apply(&self, groups: impl IntoIterator<Item = MenuLinkGroup>) -> Vec<MenuLinkGroup> {
        let matching = groups
            .into_iter()
            .filter(|g| self.status.is_none_or(|status| g.status == status))
            .skip(self.offset.unwrap_or(0));

        match self.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }
}

/// Storage for menu link group config entities.
///
/// `list` returns groups ordered by id, which is also the order groups are
/// applied to the menu tree.
#[async_trait]
pub trait GroupStorage: Send + Sync {
    /// Load a group by id.
    ///
    /// Returns `None` if the group doesn't exist.
    async fn load(&self, id: &str) -> Result<Option<MenuLinkGroup>>;

    /// Save a group (insert or update).
    async fn save(&self, group: &MenuLinkGroup) -> Result<SaveStatus>;

    /// Delete a group by id.
    ///
    /// Returns `true` if a group was deleted, `false` if it didn't exist.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// List groups, optionally filtered.
    async fn list(&self, filter: Option<&GroupFilter>) -> Result<Vec<MenuLinkGroup>>;

    /// Check if a group exists.
    async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.load(id).await?.is_some())
    }

    /// Every group with `status = 1`.
    async fn load_enabled(&self) -> Result<Vec<MenuLinkGroup>> {
        self.list(Some(&GroupFilter::new().with_status(true))).await
    }
}
