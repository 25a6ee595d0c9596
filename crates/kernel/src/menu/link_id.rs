//! Composite menu link identifiers.
//!
//! Group definitions refer to menu links as `menu-name:menu-link-id`, the same
//! format the menu parent selector uses for its option keys. Example:
//! `admin:admin_toolbar_tools.extra_links:node.add.article`. Here "admin" is
//! the menu name and `admin_toolbar_tools.extra_links:node.add.article` is the
//! link id. Only the first colon separates the two parts.

/// Split a composite identifier into `(menu_name, link_id)`.
///
/// Splits on the first colon only, so the link id keeps any colons of its
/// own. Nothing is validated: empty parts come back as empty strings, and a
/// value without a colon yields an empty menu name with the whole value as
/// the link id.
pub fn split_menu_link(raw: &str) -> (&str, &str) {
    raw.split_once(':').unwrap_or(("", raw))
}

/// Build a composite identifier from its parts.
pub fn join_menu_link(menu_name: &str, link_id: &str) -> String {
    format!("{menu_name}:{link_id}")
}

/// Whether a value has the `menu-name:menu-link-id` shape at all.
///
/// The splitter itself accepts anything; this predicate is for the form and
/// config-import boundaries, which reject values the splitter would mangle.
pub fn is_composite(raw: &str) -> bool {
    matches!(raw.split_once(':'), Some((menu, _)) if !menu.is_empty())
}
