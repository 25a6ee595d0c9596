//! Menu parent select options.
//!
//! Option keys are composite `menu-name:menu-link-id` values; each menu also
//! gets a `menu-name:` root option. Labels are indented with `--` per level.

use std::collections::HashSet;

use crate::menu::link_id::join_menu_link;
use crate::menu::{MenuLinkDefinition, MenuLinkTree};

/// Titles longer than this are cut in option labels.
const MAX_TITLE_LENGTH: usize = 30;

/// Build select options for every menu in the tree.
///
/// `exclude` removes one link and everything below it, so a group's own link
/// is never offered as its parent.
pub fn parent_select_options(tree: &MenuLinkTree, exclude: Option<&str>) -> Vec<(String, String)> {
    let mut options = Vec::new();

    for menu_name in tree.menu_names() {
        options.push((join_menu_link(menu_name, ""), format!("<{menu_name}>")));

        let mut visited = HashSet::new();
        for root in tree.roots(menu_name) {
            walk(tree, root, menu_name, "--", exclude, &mut visited, &mut options);
        }
    }

    options
}

fn walk<'a>(
    tree: &'a MenuLinkTree,
    link: &'a MenuLinkDefinition,
    menu_name: &str,
    indent: &str,
    exclude: Option<&str>,
    visited: &mut HashSet<&'a str>,
    options: &mut Vec<(String, String)>,
) {
    if exclude == Some(link.id.as_str()) || !visited.insert(link.id.as_str()) {
        return;
    }

    let mut label = format!("{indent} {}", truncate(&link.title));
    if !link.enabled {
        label.push_str(" (disabled)");
    }
    options.push((join_menu_link(menu_name, &link.id), label));

    let child_indent = format!("{indent}--");
    // A child moved here from another menu is listed under its parent's menu.
    for child in tree.children_of(&link.id) {
        walk(tree, child, menu_name, &child_indent, exclude, visited, options);
    }
}

fn truncate(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_LENGTH {
        title.to_string()
    } else {
        title.chars().take(MAX_TITLE_LENGTH).collect()
    }
}
