//! Menu link group test utilities.
//!
//! Helpers for integration testing: group and link fixtures rendered the way
//! config files and providers deliver them, scratch directories, and
//! assertion utilities.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Create a test group with default values: enabled, weight 0, parent
/// `admin:system.admin`, no children.
pub fn test_group(id: &str, label: &str) -> TestGroup {
    TestGroup {
        id: id.to_string(),
        group_label: label.to_string(),
        status: true,
        weight: 0,
        parent_menu_link: "admin:system.admin".to_string(),
        child_menu_links: Vec::new(),
    }
}

/// A group builder for creating config fixtures.
///
/// Field names match the stored config, so the YAML output can be dropped
/// straight into a config directory.
#[derive(Debug, Clone, Serialize)]
pub struct TestGroup {
    pub id: String,
    pub group_label: String,
    pub status: bool,
    pub weight: i32,
    pub parent_menu_link: String,
    pub child_menu_links: Vec<String>,
}

impl TestGroup {
    /// Set the parent menu link.
    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent_menu_link = parent.to_string();
        self
    }

    /// Add a child menu link.
    pub fn with_child(mut self, child: &str) -> Self {
        self.child_menu_links.push(child.to_string());
        self
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Set as disabled.
    pub fn disabled(mut self) -> Self {
        self.status = false;
        self
    }

    /// Config file name for this group.
    pub fn filename(&self) -> String {
        format!("localgov_menu_link_group.{}.yml", self.id)
    }

    /// Render as a config YAML document.
    pub fn to_yaml(&self) -> Result<String, serde_yml::Error> {
        serde_yml::to_string(self)
    }

    /// Render as JSON.
    pub fn to_json(&self) -> JsonValue {
        serde_json::json!({
            "id": self.id,
            "group_label": self.group_label,
            "status": self.status,
            "weight": self.weight,
            "parent_menu_link": self.parent_menu_link,
            "child_menu_links": self.child_menu_links,
        })
    }
}

/// Create a test menu link in the given menu.
pub fn test_link(id: &str, title: &str, menu_name: &str) -> TestLink {
    TestLink {
        id: id.to_string(),
        title: title.to_string(),
        menu_name: menu_name.to_string(),
        parent: String::new(),
        weight: 0,
    }
}

/// A menu link builder, in the shape providers contribute links.
#[derive(Debug, Clone, Serialize)]
pub struct TestLink {
    pub id: String,
    pub title: String,
    pub menu_name: String,
    pub parent: String,
    pub weight: i32,
}

impl TestLink {
    /// Set the parent link id.
    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = parent.to_string();
        self
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Render as JSON.
    pub fn to_json(&self) -> JsonValue {
        serde_json::json!({
            "id": self.id,
            "title": self.title,
            "menu_name": self.menu_name,
            "parent": self.parent,
            "weight": self.weight,
        })
    }
}

/// Links of a stock admin install: (provider, id, title, menu, parent, weight).
const STANDARD_LINKS: &[(&str, &str, &str, &str, &str, i32)] = &[
    ("system", "system.admin", "Administration", "admin", "", 0),
    ("system", "system.admin_content", "Content", "admin", "system.admin", -10),
    ("system", "system.admin_structure", "Structure", "admin", "system.admin", -8),
    ("system", "system.admin_config", "Configuration", "admin", "system.admin", 0),
    ("system", "system.admin_config_development", "Development", "admin", "system.admin_config", -10),
    ("system", "system.performance_settings", "Performance", "admin", "system.admin_config_development", -20),
    ("system", "system.logging_settings", "Logging and errors", "admin", "system.admin_config_development", -15),
    ("node", "node.add_page", "Add content", "admin", "system.admin_content", 0),
    ("admin_toolbar_tools", "admin_toolbar_tools.extra_links:node.add.article", "Article", "admin", "node.add_page", 0),
    ("admin_toolbar_tools", "admin_toolbar_tools.extra_links:node.add.page", "Basic page", "admin", "node.add_page", 1),
    ("user", "user.page", "My account", "account", "", -10),
    ("user", "user.logout", "Log out", "account", "", 10),
];

fn standard_links_by_provider() -> Vec<(&'static str, Vec<TestLink>)> {
    let mut providers: Vec<(&'static str, Vec<TestLink>)> = Vec::new();

    for &(provider, id, title, menu, parent, weight) in STANDARD_LINKS {
        let link = test_link(id, title, menu).with_parent(parent).with_weight(weight);
        match providers.iter_mut().find(|(p, _)| *p == provider) {
            Some((_, links)) => links.push(link),
            None => providers.push((provider, vec![link])),
        }
    }

    providers
}

/// Stock admin links as (provider, JSON array) pairs.
pub fn standard_admin_links() -> Vec<(String, String)> {
    standard_links_by_provider()
        .into_iter()
        .map(|(provider, links)| {
            let json: Vec<JsonValue> = links.iter().map(TestLink::to_json).collect();
            (provider.to_string(), JsonValue::Array(json).to_string())
        })
        .collect()
}

/// Stock admin links as `<provider>.links.menu.yml` (file name, contents) pairs.
pub fn standard_admin_links_yaml() -> Result<Vec<(String, String)>, serde_yml::Error> {
    standard_links_by_provider()
        .into_iter()
        .map(|(provider, links)| {
            let by_id: std::collections::BTreeMap<&str, JsonValue> = links
                .iter()
                .map(|l| {
                    let mut json = l.to_json();
                    if let Some(obj) = json.as_object_mut() {
                        obj.remove("id");
                    }
                    (l.id.as_str(), json)
                })
                .collect();
            Ok((format!("{provider}.links.menu.yml"), serde_yml::to_string(&by_id)?))
        })
        .collect()
}

/// A scratch directory under the system temp dir, removed on drop.
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    /// Create a fresh, uniquely named directory.
    pub fn new(label: &str) -> io::Result<Self> {
        let path = std::env::temp_dir().join(format!("menu-link-group-{label}-{}", Uuid::now_v7()));
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a file inside the directory, creating subdirectories as needed.
    pub fn write(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        let path = self.path.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Write a group's config file.
    pub fn write_group(&self, group: &TestGroup) -> io::Result<PathBuf> {
        let yaml = group.to_yaml().map_err(io::Error::other)?;
        self.write(&group.filename(), &yaml)
    }

    /// Names of the files directly inside the directory, sorted.
    pub fn file_names(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        // Best effort; a leftover temp dir must not fail the test.
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Assertion helpers.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that two lists hold the same items, ignoring order.
    pub fn same_items<T: Ord + std::fmt::Debug + Clone>(actual: &[T], expected: &[T]) {
        let mut a = actual.to_vec();
        let mut e = expected.to_vec();
        a.sort();
        e.sort();
        assert_eq!(a, e, "Expected the same items, ignoring order");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_group_builder() {
        let group = test_group("localgov_menu_link_group_test", "Test")
            .with_parent("account:user.page")
            .with_child("admin:system.performance_settings")
            .with_weight(4)
            .disabled();

        assert_eq!(group.filename(), "localgov_menu_link_group.localgov_menu_link_group_test.yml");
        assert!(!group.status);
        assert_eq!(group.to_json()["child_menu_links"][0], "admin:system.performance_settings");

        let yaml = group.to_yaml().unwrap();
        assert::contains(&yaml, "group_label: Test");
        assert::contains(&yaml, "account:user.page");
    }

    #[test]
    fn test_link_builder() {
        let link = test_link("system.admin_content", "Content", "admin").with_parent("system.admin");
        let json = link.to_json();
        assert::has_key(&json, "menu_name");
        assert_eq!(json["parent"], "system.admin");
    }

    #[test]
    fn test_standard_links() {
        let providers = standard_admin_links();
        let names: Vec<_> = providers.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(names, vec!["system", "node", "admin_toolbar_tools", "user"]);

        let system: Vec<JsonValue> = serde_json::from_str(&providers[0].1).unwrap();
        assert_eq!(system.len(), 7);

        let files = standard_admin_links_yaml().unwrap();
        assert_eq!(files[0].0, "system.links.menu.yml");
        assert::contains(&files[2].1, "admin_toolbar_tools.extra_links:node.add.article");
    }

    #[test]
    fn test_temp_dir() {
        let path;
        {
            let dir = TempDir::new("utils").unwrap();
            path = dir.path().to_path_buf();
            dir.write("b.yml", "b").unwrap();
            dir.write_group(&test_group("a", "A")).unwrap();
            dir.write("nested/c.yml", "c").unwrap();

            assert_eq!(
                dir.file_names().unwrap(),
                vec!["b.yml", "localgov_menu_link_group.a.yml"]
            );
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_assertions() {
        let json = serde_json::json!({"name": "test", "value": 42});
        assert::has_key(&json, "name");

        assert::contains("hello world", "world");
        assert::not_contains("hello world", "foo");
        assert::same_items(&[3, 1, 2], &[1, 2, 3]);
    }
}
