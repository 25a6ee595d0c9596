//! Menu discovery pass.
//!
//! 1. Start from the links every provider contributed.
//! 2. Add one synthetic link per enabled group, keyed
//!    `localgov_menu_link_group:<group-id>`.
//! 3. Alter the combined tree: move each group's child links below its link.
//!
//! Nothing here is persisted; the pass runs again whenever the tree is rebuilt.

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::deriver::{DerivedLinks, GroupLinkDeriver, group_link_id};
use super::grouper::MenuLinkGrouper;
use super::tree::MenuLinkTree;
use crate::config_storage::GroupStorage;
use crate::models::MenuLinkGroup;

/// Insert derived group links into the tree.
pub fn add_group_links(tree: &mut MenuLinkTree, derived: DerivedLinks) {
    for (group_id, link) in derived {
        tree.insert_as(group_link_id(&group_id), link);
    }
}

/// Move the child links of every enabled group below the group's link.
///
/// Groups are applied in the order given; when two groups claim the same
/// link the later one wins.
pub fn menu_links_discovered_alter(tree: &mut MenuLinkTree, groups: &[MenuLinkGroup]) {
    let mut grouper = MenuLinkGrouper::new(tree);
    for group in groups.iter().filter(|g| g.is_enabled()) {
        grouper.group_child_menu_links(group, &group.id);
    }
}

/// Run derivation and alteration over an already-discovered tree.
pub fn discover(mut tree: MenuLinkTree, groups: &[MenuLinkGroup], deriver: &GroupLinkDeriver) -> MenuLinkTree {
    let derived = deriver.derive(groups);
    debug!(groups = derived.len(), "adding group menu links");

    add_group_links(&mut tree, derived);
    menu_links_discovered_alter(&mut tree, groups);
    tree
}

/// Rebuild the full tree with the enabled groups from storage.
pub async fn rebuild(
    storage: &dyn GroupStorage,
    base_links: MenuLinkTree,
    deriver: &GroupLinkDeriver,
) -> Result<MenuLinkTree> {
    let groups = storage
        .load_enabled()
        .await
        .context("failed to load enabled menu link groups")?;

    let tree = discover(base_links, &groups, deriver);
    info!(links = tree.len(), groups = groups.len(), "Menu link tree rebuilt");

    Ok(tree)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config_storage::MemoryGroupStorage;
    use crate::menu::tree::MenuLinkDefinition;

    fn base_tree() -> MenuLinkTree {
        let mut tree = MenuLinkTree::new();
        tree.insert(MenuLinkDefinition::new("system.admin", "Administration", "admin"));
        tree.insert(
            MenuLinkDefinition::new("system.admin_config", "Configuration", "admin").parent("system.admin"),
        );
        tree.insert(
            MenuLinkDefinition::new("system.admin_config_development", "Development", "admin")
                .parent("system.admin_config"),
        );
        tree.insert(
            MenuLinkDefinition::new("system.performance_settings", "Performance", "admin")
                .parent("system.admin_config_development"),
        );
        tree.insert(
            MenuLinkDefinition::new("system.logging_settings", "Logging and errors", "admin")
                .parent("system.admin_config_development"),
        );
        tree.insert(MenuLinkDefinition::new("user.page", "My account", "account"));
        tree
    }

    fn test_group() -> MenuLinkGroup {
        MenuLinkGroup::new("localgov_menu_link_group_test", "Test group")
            .parent("admin:system.admin_config_development")
            .child("admin:system.performance_settings")
            .child("admin:system.logging_settings")
    }

    #[test]
    fn group_link_is_added_and_children_moved() {
        let tree = discover(base_tree(), &[test_group()], &GroupLinkDeriver::default());

        let group_link_id = "localgov_menu_link_group:localgov_menu_link_group_test";
        let group_link = tree.get(group_link_id).unwrap();
        assert_eq!(group_link.id, group_link_id);
        assert_eq!(group_link.title, "Test group");
        assert_eq!(group_link.menu_name, "admin");

        let children: Vec<_> = tree.child_ids(group_link_id).into_iter().collect();
        assert_eq!(
            children,
            vec!["system.logging_settings", "system.performance_settings"]
        );
        assert!(tree.parent_ids(group_link_id).contains(&"system.admin_config_development"));
        assert!(tree.child_ids("system.admin_config_development").contains(group_link_id));
    }

    #[test]
    fn disabled_group_changes_nothing() {
        let before = base_tree();
        let tree = discover(base_tree(), &[test_group().disabled()], &GroupLinkDeriver::default());

        assert_eq!(tree.len(), before.len());
        assert_eq!(
            tree.get("system.performance_settings").unwrap().parent,
            "system.admin_config_development"
        );
    }

    #[test]
    fn dangling_children_do_not_abort_the_pass() {
        let group = test_group().child("admin:gone.missing");
        let tree = discover(base_tree(), &[group], &GroupLinkDeriver::default());

        assert!(!tree.contains("gone.missing"));
        assert_eq!(
            tree.child_ids("localgov_menu_link_group:localgov_menu_link_group_test").len(),
            2
        );
    }

    #[test]
    fn groups_can_nest() {
        let outer = MenuLinkGroup::new("outer", "Outer")
            .parent("admin:system.admin")
            .child("admin:localgov_menu_link_group:inner");
        let inner = MenuLinkGroup::new("inner", "Inner")
            .parent("admin:system.admin_config")
            .child("admin:system.logging_settings");

        let tree = discover(base_tree(), &[inner, outer], &GroupLinkDeriver::default());

        assert_eq!(
            tree.parent_ids("system.logging_settings"),
            vec![
                "localgov_menu_link_group:inner",
                "localgov_menu_link_group:outer",
                "system.admin"
            ]
        );
    }

    #[tokio::test]
    async fn rebuild_reads_enabled_groups_from_storage() {
        let storage = MemoryGroupStorage::with_groups([
            test_group(),
            MenuLinkGroup::new("off", "Off")
                .parent("account:user.page")
                .child("admin:system.admin_config")
                .disabled(),
        ]);

        let tree = rebuild(&storage, base_tree(), &GroupLinkDeriver::default())
            .await
            .unwrap();

        assert!(tree.contains("localgov_menu_link_group:localgov_menu_link_group_test"));
        assert!(!tree.contains("localgov_menu_link_group:off"));
        assert_eq!(tree.get("system.admin_config").unwrap().parent, "system.admin");
    }
}
