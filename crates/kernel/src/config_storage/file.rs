//! Active config directory implementation of GroupStorage.
//!
//! Each group lives in `localgov_menu_link_group.{id}.yml` inside the
//! directory, the same layout config export writes, so an active directory
//! can be copied into a sync directory as-is.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tracing::{debug, warn};

use super::yaml::{
    deserialize_group, entity_filename, parse_config_filename, serialize_group,
    validate_entity_id_for_filename,
};
use super::{GroupFilter, GroupStorage, SaveStatus};
use crate::models::MenuLinkGroup;

/// Groups stored as YAML files in one directory.
#[derive(Debug, Clone)]
pub struct FileGroupStorage {
    dir: PathBuf,
}

impl FileGroupStorage {
    /// Use `dir` as the active config directory. The directory is created on
    /// first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The active config directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        validate_entity_id_for_filename(id)?;
        Ok(self.dir.join(entity_filename(id)))
    }
}

#[async_trait]
impl GroupStorage for FileGroupStorage {
    async fn load(&self, id: &str) -> Result<Option<MenuLinkGroup>> {
        let path = self.path_for(id)?;

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        let group = deserialize_group(&content)
            .with_context(|| format!("invalid group config in {}", path.display()))?;
        if group.id != id {
            bail!(
                "group id '{}' in {} does not match filename id '{id}'",
                group.id,
                path.display()
            );
        }
        Ok(Some(group))
    }

    async fn save(&self, group: &MenuLinkGroup) -> Result<SaveStatus> {
        let path = self.path_for(&group.id)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create directory {}", self.dir.display()))?;

        let status = if tokio::fs::try_exists(&path).await? {
            SaveStatus::Updated
        } else {
            SaveStatus::New
        };

        // Write then rename so readers never see a half-written file.
        let yaml = serialize_group(group)?;
        let tmp = path.with_extension("yml.tmp");
        tokio::fs::write(&tmp, yaml)
            .await
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("failed to move {} into place", tmp.display()))?;

        debug!(group = %group.id, ?status, "saved menu link group");
        Ok(status)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let path = self.path_for(id)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
        }
    }

    async fn list(&self, filter: Option<&GroupFilter>) -> Result<Vec<MenuLinkGroup>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read directory {}", self.dir.display()));
            }
        };

        let mut groups = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(id) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(parse_config_filename)
            else {
                continue;
            };

            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            match deserialize_group(&content) {
                Ok(group) if group.id == id => groups.push(group),
                Ok(group) => {
                    warn!(file = %path.display(), content_id = %group.id, "group id does not match filename");
                }
                Err(e) => warn!(file = %path.display(), error = %e, "skipping invalid group config"),
            }
        }

        groups.sort_by(|a, b| a.id.cmp(&b.id));
        groups.dedup_by(|a, b| a.id == b.id);

        Ok(match filter {
            Some(f) => f.apply(groups),
            None => groups,
        })
    }
}
