//! Reassign the parent of a group's child menu links.
//!
//! Every group gets its own menu link (see [`super::deriver`]). Here the
//! original parent of each child link is replaced with that group link.
//!
//! Example: child link A belongs to group G and its original parent is B.
//! After reassignment A's parent is G's menu link.

use tracing::debug;

use super::deriver::{GROUP_LINK_BASE_ID, group_link_id};
use super::link_id::{join_menu_link, split_menu_link};
use super::tree::MenuLinkTree;
use crate::models::MenuLinkGroup;

/// Holds exclusive access to the whole menu tree for one discovery pass.
#[derive(Debug)]
pub struct MenuLinkGrouper<'a> {
    menu_links: &'a mut MenuLinkTree,
}

impl<'a> MenuLinkGrouper<'a> {
    /// Borrow the tree for the duration of the alteration.
    pub fn new(menu_links: &'a mut MenuLinkTree) -> Self {
        Self { menu_links }
    }

    /// Reassign the parent link of every child link of a group.
    ///
    /// Child links missing from the tree are skipped. Running this again with
    /// the same group leaves the tree unchanged. When two groups claim the same
    /// link, the group processed last wins.
    pub fn group_child_menu_links(&mut self, group: &MenuLinkGroup, group_id: &str) {
        let group_link = group_link_id(group_id);

        let mut moved = 0usize;
        for child_menu_link in &group.child_menu_links {
            if self.set_new_parent_for_child_menu_link(child_menu_link, &group_link) {
                moved += 1;
            }
        }

        debug!(
            group = %group_id,
            configured = group.child_menu_links.len(),
            moved,
            "grouped child menu links"
        );
    }

    fn set_new_parent_for_child_menu_link(&mut self, child_menu_link: &str, group_link: &str) -> bool {
        let (_, child_link_id) = split_menu_link(child_menu_link);

        let Some(link) = self.menu_links.get_mut(child_link_id) else {
            debug!(child = %child_menu_link, "unknown child menu link skipped");
            return false;
        };

        if link.parent != group_link && is_group_link(&link.parent) {
            debug!(
                child = %child_link_id,
                previous = %link.parent,
                group_link = %group_link,
                "menu link claimed by more than one group"
            );
        }

        link.parent = group_link.to_string();
        true
    }
}

fn is_group_link(id: &str) -> bool {
    id.strip_prefix(GROUP_LINK_BASE_ID)
        .is_some_and(|rest| rest.starts_with(':'))
}

/// Move every child link into the parent link's menu.
///
/// Child links render below the group link, which lives in the parent link's
/// menu, so their composite ids must name that menu too. Returns the input
/// unchanged when either argument is empty.
///
/// Example: child `foo:bar` with parent `qux:baz` becomes `qux:bar`.
pub fn fix_menu_for_all_child_links(child_menu_links: &[String], parent_menu_link: &str) -> Vec<String> {
    if child_menu_links.is_empty() || parent_menu_link.is_empty() {
        return child_menu_links.to_vec();
    }

    let (parent_menu, _) = split_menu_link(parent_menu_link);

    child_menu_links
        .iter()
        .map(|child| fix_menu_for_child_link(child, parent_menu))
        .collect()
}

fn fix_menu_for_child_link(child_menu_link: &str, parent_menu: &str) -> String {
    let (_, child_link_id) = split_menu_link(child_menu_link);
    join_menu_link(parent_menu, child_link_id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::menu::tree::MenuLinkDefinition;

    fn tree() -> MenuLinkTree {
        let mut tree = MenuLinkTree::new();
        tree.insert(MenuLinkDefinition::new("a", "A", "menuA").parent("x"));
        tree.insert(MenuLinkDefinition::new("b", "B", "menuB").parent("y"));
        tree.insert(MenuLinkDefinition::new("c", "C", "menuA").parent("x"));
        tree
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn children_move_under_group_link() {
        let mut tree = tree();
        let group = MenuLinkGroup::new("g", "G").child("menuA:a").child("menuB:b");

        MenuLinkGrouper::new(&mut tree).group_child_menu_links(&group, "g");

        assert_eq!(tree.get("a").unwrap().parent, "localgov_menu_link_group:g");
        assert_eq!(tree.get("b").unwrap().parent, "localgov_menu_link_group:g");
        assert_eq!(tree.get("c").unwrap().parent, "x");
    }

    #[test]
    fn missing_children_are_skipped() {
        let mut tree = tree();
        let before = tree.clone();
        let group = MenuLinkGroup::new("g", "G").child("menuA:missing");

        MenuLinkGrouper::new(&mut tree).group_child_menu_links(&group, "g");

        for link in before.all() {
            assert_eq!(tree.get(&link.id), Some(link));
        }
        assert_eq!(tree.len(), before.len());
    }

    #[test]
    fn menu_name_is_ignored_when_matching() {
        let mut tree = tree();
        let group = MenuLinkGroup::new("g", "G").child("some_other_menu:c");

        MenuLinkGrouper::new(&mut tree).group_child_menu_links(&group, "g");

        assert_eq!(tree.get("c").unwrap().parent, "localgov_menu_link_group:g");
    }

    #[test]
    fn link_ids_with_colons() {
        let mut tree = MenuLinkTree::new();
        tree.insert(
            MenuLinkDefinition::new("admin_toolbar_tools.extra_links:node.add.article", "Article", "admin")
                .parent("node.add_page"),
        );
        let group = MenuLinkGroup::new("g", "G").child("admin:admin_toolbar_tools.extra_links:node.add.article");

        MenuLinkGrouper::new(&mut tree).group_child_menu_links(&group, "g");

        assert_eq!(
            tree.get("admin_toolbar_tools.extra_links:node.add.article")
                .unwrap()
                .parent,
            "localgov_menu_link_group:g"
        );
    }

    #[test]
    fn grouping_is_idempotent() {
        let group = MenuLinkGroup::new("g", "G").child("menuA:a").child("menuA:a");

        let mut once = tree();
        MenuLinkGrouper::new(&mut once).group_child_menu_links(&group, "g");

        let mut twice = tree();
        let mut grouper = MenuLinkGrouper::new(&mut twice);
        grouper.group_child_menu_links(&group, "g");
        grouper.group_child_menu_links(&group, "g");

        for link in once.all() {
            assert_eq!(twice.get(&link.id), Some(link));
        }
    }

    #[test]
    fn last_group_wins() {
        let mut tree = tree();
        let first = MenuLinkGroup::new("first", "First").child("menuA:a");
        let second = MenuLinkGroup::new("second", "Second").child("menuA:a");

        let mut grouper = MenuLinkGrouper::new(&mut tree);
        grouper.group_child_menu_links(&first, "first");
        grouper.group_child_menu_links(&second, "second");

        assert_eq!(tree.get("a").unwrap().parent, "localgov_menu_link_group:second");
    }

    #[test]
    fn group_link_detection() {
        assert!(is_group_link("localgov_menu_link_group:g"));
        assert!(!is_group_link("localgov_menu_link_group_g"));
        assert!(!is_group_link("system.admin"));
    }

    #[test]
    fn fix_menu_rewrites_menu_name() {
        let fixed = fix_menu_for_all_child_links(&strings(&["admin:system.admin_content"]), "account:user.page");
        assert_eq!(fixed, strings(&["account:system.admin_content"]));
    }

    #[test]
    fn fix_menu_keeps_link_id_colons() {
        let fixed = fix_menu_for_all_child_links(&strings(&["foo:bar:baz", "qux:quux"]), "main:home");
        assert_eq!(fixed, strings(&["main:bar:baz", "main:quux"]));
    }

    #[test]
    fn fix_menu_empty_inputs_unchanged() {
        assert!(fix_menu_for_all_child_links(&[], "account:user.page").is_empty());

        let children = strings(&["admin:system.admin_content"]);
        assert_eq!(fix_menu_for_all_child_links(&children, ""), children);
    }

    #[test]
    fn fix_menu_is_idempotent() {
        let children = strings(&["admin:a", "tools:b:c", "d"]);
        let once = fix_menu_for_all_child_links(&children, "account:user.page");
        let twice = fix_menu_for_all_child_links(&once, "account:user.page");
        assert_eq!(once, twice);
    }
}
