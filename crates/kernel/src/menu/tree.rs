//! Menu link tree - every discovered menu link, keyed by link id.
//!
//! Providers contribute links either as JSON arrays (one array per provider)
//! or as `<provider>.links.menu.yml` files mapping link id to definition.
//! The tree is keyed purely by link id across all menus; `menu_name` on each
//! record says which menu the link renders in.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Suffix of menu link definition files.
pub const LINKS_FILE_SUFFIX: &str = ".links.menu.yml";

/// A menu link definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuLinkDefinition {
    /// Link id, unique across all menus (e.g., "system.admin_content").
    #[serde(default)]
    pub id: String,

    /// Human-readable title.
    pub title: String,

    /// Optional description (shown as the link's title attribute).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Menu the link renders in (e.g., "admin", "account").
    #[serde(default = "default_menu_name")]
    pub menu_name: String,

    /// Parent link id (empty = top level of the menu).
    #[serde(default)]
    pub parent: String,

    /// Sort weight (lower = higher priority)
    #[serde(default)]
    pub weight: i32,

    /// Route the link points at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_name: Option<String>,

    /// External or path-based URL, used when there is no route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Provider (module/plugin) that contributed the link.
    #[serde(default)]
    pub provider: String,

    /// Implementation used to build the link at render time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Disabled links stay in the tree but are not rendered.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether children are always shown.
    #[serde(default)]
    pub expanded: bool,

    /// Anything else a provider attaches; carried through untouched.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

fn default_true() -> bool {
    true
}

fn default_menu_name() -> String {
    "tools".to_string()
}

impl MenuLinkDefinition {
    /// Create a link with the given id and title in the given menu.
    pub fn new(id: impl Into<String>, title: impl Into<String>, menu_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            menu_name: menu_name.into(),
            parent: String::new(),
            weight: 0,
            route_name: None,
            url: None,
            provider: String::new(),
            class: None,
            enabled: true,
            expanded: false,
            metadata: Map::new(),
        }
    }

    /// Set the parent link id.
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = parent.into();
        self
    }

    /// Set the weight.
    pub fn weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Whether the link sits at the top level of its menu.
    pub fn is_root(&self) -> bool {
        self.parent.is_empty()
    }
}

/// All discovered menu links, keyed by link id.
#[derive(Debug, Clone, Default)]
pub struct MenuLinkTree {
    links: HashMap<String, MenuLinkDefinition>,
}

impl MenuLinkTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree from JSON arrays of link definitions.
    ///
    /// Each element in `link_jsons` is a (provider, json_array) tuple. A
    /// provider whose JSON does not parse is skipped with a warning.
    pub fn from_provider_results(link_jsons: Vec<(String, String)>) -> Self {
        let mut tree = Self::new();

        for (provider, json) in link_jsons {
            match serde_json::from_str::<Vec<MenuLinkDefinition>>(&json) {
                Ok(links) => {
                    for mut link in links {
                        if link.id.is_empty() {
                            warn!(provider = %provider, title = %link.title, "menu link without id skipped");
                            continue;
                        }
                        link.provider = provider.clone();
                        tree.insert(link);
                    }
                }
                Err(e) => {
                    warn!(
                        provider = %provider,
                        error = %e,
                        "failed to parse menu link definitions"
                    );
                }
            }
        }

        debug!(links = tree.len(), "built menu link tree");
        tree
    }

    /// Create a tree from one `links.menu.yml` document.
    pub fn from_links_yaml(provider: &str, yaml: &str) -> Result<Self> {
        let mut tree = Self::new();
        tree.merge_links_yaml(provider, yaml)?;
        Ok(tree)
    }

    /// Merge a `links.menu.yml` document into the tree.
    ///
    /// The document maps link id to definition; the key always wins over any
    /// `id` inside the definition. Returns the number of links added.
    pub fn merge_links_yaml(&mut self, provider: &str, yaml: &str) -> Result<usize> {
        let parsed: BTreeMap<String, MenuLinkDefinition> = serde_yml::from_str(yaml)
            .with_context(|| format!("failed to parse menu links for provider '{provider}'"))?;

        let count = parsed.len();
        for (id, mut link) in parsed {
            link.id = id;
            link.provider = provider.to_string();
            self.insert(link);
        }

        Ok(count)
    }

    /// Load every `<provider>.links.menu.yml` file in a directory.
    ///
    /// Files that fail to parse are skipped with a warning so one broken
    /// provider does not hide every other menu.
    pub async fn load_links_dir(dir: &Path) -> Result<Self> {
        let mut tree = Self::new();

        let mut entries = tokio::fs::read_dir(dir)
            .await
            .with_context(|| format!("failed to read directory {}", dir.display()))?;

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if let Some(provider) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_suffix(LINKS_FILE_SUFFIX))
            {
                files.push((provider.to_string(), path));
            }
        }
        // Directory order is platform dependent; later providers override earlier ones.
        files.sort();

        for (provider, path) in files {
            let yaml = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            match tree.merge_links_yaml(&provider, &yaml) {
                Ok(count) => debug!(provider = %provider, count, "loaded menu links"),
                Err(e) => warn!(file = %path.display(), error = %e, "skipping menu links file"),
            }
        }

        Ok(tree)
    }

    /// Insert a link, replacing any link with the same id.
    pub fn insert(&mut self, link: MenuLinkDefinition) -> Option<MenuLinkDefinition> {
        self.links.insert(link.id.clone(), link)
    }

    /// Insert a link under an explicit key, rewriting its id to match.
    pub fn insert_as(&mut self, id: impl Into<String>, mut link: MenuLinkDefinition) {
        link.id = id.into();
        self.insert(link);
    }

    /// Get a link by id.
    pub fn get(&self, id: &str) -> Option<&MenuLinkDefinition> {
        self.links.get(id)
    }

    /// Get a mutable link by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut MenuLinkDefinition> {
        self.links.get_mut(id)
    }

    /// Check whether a link id is present.
    pub fn contains(&self, id: &str) -> bool {
        self.links.contains_key(id)
    }

    /// Get all links, in no particular order.
    pub fn all(&self) -> impl Iterator<Item = &MenuLinkDefinition> {
        self.links.values()
    }

    /// Names of every menu with at least one link.
    pub fn menu_names(&self) -> BTreeSet<&str> {
        self.links.values().map(|l| l.menu_name.as_str()).collect()
    }

    /// Direct children of a link, sorted by weight then title.
    pub fn children_of(&self, parent: &str) -> Vec<&MenuLinkDefinition> {
        let mut children: Vec<_> = self
            .links
            .values()
            .filter(|l| !l.parent.is_empty() && l.parent == parent)
            .collect();
        sort_links(&mut children);
        children
    }

    /// Ids of the direct children of a link, sorted by id.
    pub fn child_ids(&self, parent: &str) -> BTreeSet<&str> {
        self.links
            .values()
            .filter(|l| !l.parent.is_empty() && l.parent == parent)
            .map(|l| l.id.as_str())
            .collect()
    }

    /// Ancestors of a link, nearest first.
    ///
    /// Stops at the first parent id missing from the tree. A parent chain that
    /// loops back on itself is cut at the repeat.
    pub fn parent_ids(&self, id: &str) -> Vec<&str> {
        let mut ancestors = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = self.links.get(id);

        while let Some(link) = current {
            if link.parent.is_empty() {
                break;
            }
            let Some((parent_id, parent)) = self.links.get_key_value(link.parent.as_str()) else {
                break;
            };
            if !seen.insert(parent_id.as_str()) {
                warn!(link = %id, parent = %parent_id, "menu link parent chain loops");
                break;
            }
            ancestors.push(parent_id.as_str());
            current = Some(parent);
        }

        ancestors
    }

    /// Top-level links of a menu, sorted by weight then title.
    ///
    /// A link whose parent is missing from the tree is treated as top level.
    pub fn roots(&self, menu_name: &str) -> Vec<&MenuLinkDefinition> {
        let mut roots: Vec<_> = self
            .links
            .values()
            .filter(|l| l.menu_name == menu_name)
            .filter(|l| l.is_root() || !self.links.contains_key(&l.parent))
            .collect();
        sort_links(&mut roots);
        roots
    }

    /// Get link count.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Check if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

fn sort_links(links: &mut [&MenuLinkDefinition]) {
    links.sort_by(|a, b| {
        a.weight
            .cmp(&b.weight)
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn admin_tree() -> MenuLinkTree {
        let json = r#"[
            {"id": "system.admin", "title": "Administration", "menu_name": "admin"},
            {"id": "system.admin_content", "title": "Content", "menu_name": "admin", "parent": "system.admin", "weight": -10},
            {"id": "system.admin_structure", "title": "Structure", "menu_name": "admin", "parent": "system.admin", "weight": -8},
            {"id": "system.admin_config", "title": "Configuration", "menu_name": "admin", "parent": "system.admin", "weight": 0}
        ]"#;
        MenuLinkTree::from_provider_results(vec![("system".to_string(), json.to_string())])
    }

    #[test]
    fn tree_from_json() {
        let tree = admin_tree();
        assert_eq!(tree.len(), 4);
        let link = tree.get("system.admin_content").unwrap();
        assert_eq!(link.provider, "system");
        assert_eq!(link.parent, "system.admin");
        assert!(link.enabled);
    }

    #[test]
    fn bad_provider_json_is_skipped() {
        let tree = MenuLinkTree::from_provider_results(vec![
            ("broken".to_string(), "{not json".to_string()),
            (
                "user".to_string(),
                r#"[{"id": "user.page", "title": "My account", "menu_name": "account"}]"#.to_string(),
            ),
        ]);
        assert_eq!(tree.len(), 1);
        assert!(tree.contains("user.page"));
    }

    #[test]
    fn link_without_id_is_skipped() {
        let tree = MenuLinkTree::from_provider_results(vec![(
            "x".to_string(),
            r#"[{"title": "Nameless"}]"#.to_string(),
        )]);
        assert!(tree.is_empty());
    }

    #[test]
    fn merge_yaml_uses_key_as_id() {
        let yaml = r#"
system.admin_config_development:
  title: Development
  menu_name: admin
  parent: system.admin_config
system.performance_settings:
  title: Performance
  menu_name: admin
  parent: system.admin_config_development
  route_name: system.performance_settings
"#;
        let mut tree = MenuLinkTree::new();
        let count = tree.merge_links_yaml("system", yaml).unwrap();
        assert_eq!(count, 2);
        let link = tree.get("system.performance_settings").unwrap();
        assert_eq!(link.id, "system.performance_settings");
        assert_eq!(link.route_name.as_deref(), Some("system.performance_settings"));
    }

    #[test]
    fn missing_menu_name_defaults_to_tools() {
        let tree = MenuLinkTree::from_links_yaml("x", "x.link:\n  title: X\n").unwrap();
        assert_eq!(tree.get("x.link").unwrap().menu_name, "tools");
        assert_eq!(tree.get("x.link").unwrap().provider, "x");
    }

    #[test]
    fn unparsable_yaml_is_an_error() {
        assert!(MenuLinkTree::from_links_yaml("x", "- not\n- a map\n").is_err());
    }

    #[test]
    fn children_sorted_by_weight() {
        let tree = admin_tree();
        let children = tree.children_of("system.admin");
        let ids: Vec<_> = children.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "system.admin_content",
                "system.admin_structure",
                "system.admin_config"
            ]
        );
        assert_eq!(tree.child_ids("system.admin").len(), 3);
        assert!(tree.children_of("").is_empty());
    }

    #[test]
    fn parent_chain() {
        let mut tree = admin_tree();
        tree.insert(
            MenuLinkDefinition::new("system.admin_config_development", "Development", "admin")
                .parent("system.admin_config"),
        );
        assert_eq!(
            tree.parent_ids("system.admin_config_development"),
            vec!["system.admin_config", "system.admin"]
        );
        assert!(tree.parent_ids("system.admin").is_empty());
        assert!(tree.parent_ids("unknown").is_empty());
    }

    #[test]
    fn parent_chain_cycle_terminates() {
        let mut tree = MenuLinkTree::new();
        tree.insert(MenuLinkDefinition::new("a", "A", "main").parent("b"));
        tree.insert(MenuLinkDefinition::new("b", "B", "main").parent("a"));
        assert_eq!(tree.parent_ids("a"), vec!["b"]);
    }

    #[test]
    fn roots_include_orphans() {
        let mut tree = admin_tree();
        tree.insert(MenuLinkDefinition::new("orphan", "Orphan", "admin").parent("gone"));
        let roots = tree.roots("admin");
        let ids: Vec<_> = roots.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["system.admin", "orphan"]);
        assert_eq!(tree.menu_names().into_iter().collect::<Vec<_>>(), vec!["admin"]);
    }
}
