//! YAML-based config export/import.
//!
//! Exports every menu link group to its own YAML file and re-imports them.
//! File naming: `localgov_menu_link_group.{id}.yml`.
//!
//! Import is idempotent: [`GroupStorage::save`] performs upsert, so re-running
//! an import that was interrupted converges to the correct state.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::GroupStorage;
use crate::models::MenuLinkGroup;
use crate::models::menu_link_group::ENTITY_TYPE;

/// Maximum config file size (1 MB). Larger files are skipped during import.
pub(super) const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Characters that are invalid in filenames on Windows/NTFS.
const WINDOWS_INVALID_CHARS: &[char] = &[':', '*', '?', '"', '<', '>', '|'];

/// Result summary for config export/import operations.
#[derive(Debug, Default)]
pub struct ConfigOpResult {
    pub counts: BTreeMap<String, usize>,
    pub warnings: Vec<String>,
}

impl ConfigOpResult {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Generate the filename for a group.
pub(super) fn entity_filename(id: &str) -> String {
    format!("{ENTITY_TYPE}.{id}.yml")
}

/// Validate that a group id is safe for use in a filename.
pub(super) fn validate_entity_id_for_filename(id: &str) -> Result<()> {
    if id.is_empty() {
        anyhow::bail!("entity ID is empty");
    }
    if id.contains('/') || id.contains('\\') || id.contains('\0') {
        anyhow::bail!("entity ID contains path separator or null byte: {id}");
    }
    if id.contains("..") {
        anyhow::bail!("entity ID contains '..': {id}");
    }
    if let Some(c) = id.chars().find(|c| WINDOWS_INVALID_CHARS.contains(c)) {
        anyhow::bail!("entity ID contains character '{c}' invalid on Windows: {id}");
    }
    if id.starts_with('.') || id.ends_with('.') {
        anyhow::bail!("entity ID must not start or end with '.': {id}");
    }
    Ok(())
}

/// Parse the group id out of a config filename.
///
/// Returns `None` for files that are not menu link group config.
pub(super) fn parse_config_filename(filename: &str) -> Option<&str> {
    let stem = filename
        .strip_suffix(".yml")
        .or_else(|| filename.strip_suffix(".yaml"))?;

    let id = stem.strip_prefix(ENTITY_TYPE)?.strip_prefix('.')?;
    if id.is_empty() {
        return None;
    }

    Some(id)
}

/// Serialize a group to YAML.
pub(super) fn serialize_group(group: &MenuLinkGroup) -> Result<String> {
    serde_yml::to_string(group).with_context(|| format!("failed to serialize group {}", group.id))
}

/// Deserialize and validate a group from YAML.
pub(super) fn deserialize_group(content: &str) -> Result<MenuLinkGroup> {
    let group: MenuLinkGroup =
        serde_yml::from_str(content).context("invalid menu link group YAML")?;
    group.validate()?;
    Ok(group)
}

/// Remove stale config files from a directory after export.
///
/// Only removes menu link group config files that are NOT in the `keep` set.
/// Deletion failures are collected as warnings because the export itself has
/// already succeeded by the time this runs.
async fn clean_stale_yml_files(
    dir: &Path,
    keep: &HashSet<String>,
    warnings: &mut Vec<String>,
) -> Result<()> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if let Some(name) = path.file_name().and_then(|n| n.to_str())
            && parse_config_filename(name).is_some()
            && !keep.contains(name)
            && let Err(e) = tokio::fs::remove_file(&path).await
        {
            warnings.push(format!(
                "failed to remove stale file {}: {e}",
                path.display()
            ));
        }
    }
    Ok(())
}

/// Export every group to YAML files in the given directory.
///
/// When `clean` is true, group files that were not written by this export are
/// removed *after* writing, so a partially failed export never loses data.
pub async fn export_config(
    storage: &dyn GroupStorage,
    dir: &Path,
    clean: bool,
) -> Result<ConfigOpResult> {
    info!(dir = %dir.display(), clean, "Starting config export");

    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create directory {}", dir.display()))?;

    let mut result = ConfigOpResult::default();
    let mut written_files: HashSet<String> = HashSet::new();

    let groups = storage
        .list(None)
        .await
        .context("failed to list menu link groups")?;

    let mut count = 0usize;
    for group in groups {
        if let Err(e) = validate_entity_id_for_filename(&group.id) {
            result
                .warnings
                .push(format!("skipping {ENTITY_TYPE} with unsafe ID: {e}"));
            continue;
        }

        let yaml = match serialize_group(&group) {
            Ok(yaml) => yaml,
            Err(e) => {
                result.warnings.push(format!("{e:#}"));
                continue;
            }
        };

        let filename = entity_filename(&group.id);
        let path = dir.join(&filename);
        match tokio::fs::write(&path, &yaml).await {
            Ok(()) => {
                count += 1;
                written_files.insert(filename);
            }
            Err(e) => {
                result
                    .warnings
                    .push(format!("failed to write {}: {e}", path.display()));
            }
        }
    }

    if count > 0 {
        debug!(entity_type = ENTITY_TYPE, count, "Exported entity type");
        result.counts.insert(ENTITY_TYPE.to_string(), count);
    }

    if clean && let Err(e) = clean_stale_yml_files(dir, &written_files, &mut result.warnings).await
    {
        result
            .warnings
            .push(format!("failed to clean stale files: {e}"));
    }

    info!(total = result.total(), "Config export complete");

    Ok(result)
}

/// Import groups from YAML files in the given directory.
///
/// Every file is read and validated first; invalid files are reported as
/// warnings and skipped. When `dry_run` is true nothing is written.
pub async fn import_config(
    storage: &dyn GroupStorage,
    dir: &Path,
    dry_run: bool,
) -> Result<ConfigOpResult> {
    info!(dir = %dir.display(), dry_run, "Starting config import");

    let mut result = ConfigOpResult::default();

    let parsed = read_and_validate_files(dir, &mut result.warnings).await?;
    debug!(
        files = parsed.len(),
        warnings = result.warnings.len(),
        "Validation complete"
    );

    if dry_run {
        if !parsed.is_empty() {
            result.counts.insert(ENTITY_TYPE.to_string(), parsed.len());
        }
        return Ok(result);
    }

    let mut count = 0usize;
    for pg in &parsed {
        if let Err(e) = storage.save(&pg.group).await {
            result
                .warnings
                .push(format!("failed to save {}: {e}", pg.filename));
            continue;
        }
        count += 1;
    }

    if count > 0 {
        debug!(entity_type = ENTITY_TYPE, count, "Imported entity type");
        result.counts.insert(ENTITY_TYPE.to_string(), count);
    }

    info!(total = result.total(), "Config import complete");

    Ok(result)
}

/// A parsed group with the file it came from.
struct ParsedGroup {
    filename: String,
    group: MenuLinkGroup,
}

/// Read all group files from a directory and validate/parse them.
///
/// Returns groups sorted by filename. Parse errors, validation failures,
/// filename-content ID mismatches and duplicates are recorded as warnings and
/// the offending file is skipped.
async fn read_and_validate_files(dir: &Path, warnings: &mut Vec<String>) -> Result<Vec<ParsedGroup>> {
    let mut parsed = Vec::new();

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();

        let Some(os_name) = path.file_name() else {
            continue;
        };
        let filename = match os_name.to_str() {
            Some(n) if !n.starts_with('.') && (n.ends_with(".yml") || n.ends_with(".yaml")) => {
                n.to_string()
            }
            Some(_) => continue,
            None => {
                warnings.push(format!(
                    "skipping file with non-UTF-8 name: {}",
                    path.display()
                ));
                continue;
            }
        };

        // Config sync directories also hold other modules' config.
        let Some(filename_id) = parse_config_filename(&filename) else {
            debug!(file = %filename, "skipping non-group config file");
            continue;
        };
        let filename_id = filename_id.to_string();

        let metadata = match tokio::fs::symlink_metadata(&path).await {
            Ok(m) => m,
            Err(e) => {
                warnings.push(format!("failed to read metadata for {filename}: {e}"));
                continue;
            }
        };
        if metadata.file_type().is_symlink() {
            warnings.push(format!("skipping symlink: {filename}"));
            continue;
        }
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            warnings.push(format!(
                "skipping {filename}: file size {} bytes exceeds limit of {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            ));
            continue;
        }

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) => {
                warnings.push(format!("failed to read {}: {e}", path.display()));
                continue;
            }
        };

        let group = match deserialize_group(&content) {
            Ok(group) => group,
            Err(e) => {
                warnings.push(format!("failed to parse {filename}: {e:#}"));
                continue;
            }
        };

        if group.id != filename_id {
            warnings.push(format!(
                "{filename}: filename ID '{filename_id}' does not match content ID '{}' (skipped)",
                group.id
            ));
            continue;
        }

        parsed.push(ParsedGroup { filename, group });
    }

    parsed.sort_by(|a, b| a.filename.cmp(&b.filename));

    // The first file by name wins when two files carry the same id.
    let mut seen_ids: HashSet<String> = HashSet::new();
    parsed.retain(|pg| {
        if seen_ids.insert(pg.group.id.clone()) {
            true
        } else {
            warnings.push(format!(
                "{}: duplicate {ENTITY_TYPE} with ID '{}' (skipped)",
                pg.filename, pg.group.id
            ));
            false
        }
    });

    Ok(parsed)
}
