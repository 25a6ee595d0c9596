//! Menu link group config entity.
//!
//! A group collects menu links from any menu under one synthetic menu link.
//! The group itself hangs below `parent_menu_link`; every entry of
//! `child_menu_links` is moved below the group's link when the menu tree is
//! rebuilt. Both fields use the composite `menu-name:menu-link-id` format.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{GroupError, GroupResult};
use crate::menu::link_id::{is_composite, split_menu_link};

/// Config entity type name. Also the base id of every group menu link.
pub const ENTITY_TYPE: &str = "localgov_menu_link_group";

/// Maximum label length accepted by the admin form.
pub const MAX_LABEL_LENGTH: usize = 255;

/// Machine names: lowercase letters, digits and underscores.
///
/// # Panics
///
/// Panics if the hard-coded regex literal is invalid (impossible in practice).
#[allow(clippy::expect_used)]
static MACHINE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_]+$").expect("valid regex literal"));

/// Menu link group record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuLinkGroup {
    /// Machine name (e.g., "localgov_menu_link_group_content").
    pub id: String,

    /// Label, used as the title of the group's menu link.
    pub group_label: String,

    /// Disabled groups produce no menu link and move no children.
    #[serde(default = "default_true")]
    pub status: bool,

    /// Weight of the group's menu link.
    #[serde(default)]
    pub weight: i32,

    /// Where the group's menu link attaches (`menu-name:menu-link-id`).
    #[serde(default)]
    pub parent_menu_link: String,

    /// Members of the group (`menu-name:menu-link-id`), in configured order.
    #[serde(default)]
    pub child_menu_links: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl MenuLinkGroup {
    /// Create an enabled group with no parent and no children.
    pub fn new(id: impl Into<String>, group_label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            group_label: group_label.into(),
            status: true,
            weight: 0,
            parent_menu_link: String::new(),
            child_menu_links: Vec::new(),
        }
    }

    /// Set the parent menu link.
    pub fn parent(mut self, parent_menu_link: impl Into<String>) -> Self {
        self.parent_menu_link = parent_menu_link.into();
        self
    }

    /// Append a child menu link.
    pub fn child(mut self, child_menu_link: impl Into<String>) -> Self {
        self.child_menu_links.push(child_menu_link.into());
        self
    }

    /// Set the weight.
    pub fn weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Mark as disabled.
    pub fn disabled(mut self) -> Self {
        self.status = false;
        self
    }

    /// The group's label.
    pub fn label(&self) -> &str {
        &self.group_label
    }

    /// Whether the group takes part in menu discovery.
    pub fn is_enabled(&self) -> bool {
        self.status
    }

    /// Menu the group's own link renders in.
    pub fn parent_menu(&self) -> &str {
        split_menu_link(&self.parent_menu_link).0
    }

    /// Check the record before it is saved or imported.
    ///
    /// The menu code itself tolerates malformed links; this is where they are
    /// turned away.
    pub fn validate(&self) -> GroupResult<()> {
        validate_machine_name(&self.id)?;
        validate_label(&self.group_label)?;

        if !is_composite(&self.parent_menu_link) {
            return Err(GroupError::InvalidMenuLink {
                field: "parent_menu_link",
                value: self.parent_menu_link.clone(),
            });
        }

        for child in &self.child_menu_links {
            if !is_composite(child) || split_menu_link(child).1.is_empty() {
                return Err(GroupError::InvalidMenuLink {
                    field: "child_menu_links",
                    value: child.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Validate a machine name.
pub fn validate_machine_name(id: &str) -> GroupResult<()> {
    if MACHINE_NAME.is_match(id) {
        Ok(())
    } else {
        Err(GroupError::InvalidMachineName(id.to_string()))
    }
}

/// Validate that a label is non-empty and at most 255 characters.
fn validate_label(label: &str) -> GroupResult<()> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(GroupError::InvalidLabel("label must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_LABEL_LENGTH {
        return Err(GroupError::InvalidLabel(format!(
            "label must be at most {MAX_LABEL_LENGTH} characters, got {}",
            trimmed.chars().count()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn valid_group() -> MenuLinkGroup {
        MenuLinkGroup::new("localgov_menu_link_group_content", "Content")
            .parent("admin:system.admin")
            .child("admin:system.admin_content")
            .child("admin:admin_toolbar_tools.extra_links:node.add.article")
    }

    #[test]
    fn builder_defaults() {
        let group = MenuLinkGroup::new("g", "G");
        assert!(group.is_enabled());
        assert_eq!(group.weight, 0);
        assert!(group.child_menu_links.is_empty());
        assert!(!group.disabled().is_enabled());
    }

    #[test]
    fn valid_group_passes() {
        valid_group().validate().unwrap();
    }

    #[test]
    fn menu_root_parent_is_valid() {
        valid_group().parent("account:").validate().unwrap();
    }

    #[test]
    fn parent_without_menu_rejected() {
        let err = valid_group().parent("system.admin").validate().unwrap_err();
        assert_eq!(err.field(), Some("parent_menu_link"));
    }

    #[test]
    fn child_without_link_id_rejected() {
        let err = valid_group().child("admin:").validate().unwrap_err();
        assert_eq!(err.field(), Some("child_menu_links"));
    }

    #[test]
    fn machine_name_rules() {
        assert!(validate_machine_name("localgov_menu_link_group_foo_1").is_ok());
        assert!(validate_machine_name("Foo").is_err());
        assert!(validate_machine_name("foo-bar").is_err());
        assert!(validate_machine_name("").is_err());
    }

    #[test]
    fn label_rules() {
        assert!(valid_group().validate().is_ok());
        let mut group = valid_group();
        group.group_label = "   ".to_string();
        assert!(matches!(group.validate(), Err(GroupError::InvalidLabel(_))));
        group.group_label = "x".repeat(MAX_LABEL_LENGTH + 1);
        assert!(matches!(group.validate(), Err(GroupError::InvalidLabel(_))));
    }

    #[test]
    fn parent_menu() {
        assert_eq!(valid_group().parent_menu(), "admin");
    }

    #[test]
    fn yaml_defaults() {
        let group: MenuLinkGroup =
            serde_yml::from_str("id: g\ngroup_label: G\nparent_menu_link: 'admin:x'\n").unwrap();
        assert!(group.status);
        assert!(group.child_menu_links.is_empty());
    }
}
