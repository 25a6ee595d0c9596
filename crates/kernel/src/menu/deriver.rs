//! Group link deriver - one synthetic menu link per enabled group.
//!
//! Derived links are never stored. They are recomputed from the current group
//! definitions every time the menu tree is rebuilt.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::link_id::split_menu_link;
use super::tree::MenuLinkDefinition;
use crate::models::MenuLinkGroup;
use crate::models::menu_link_group::ENTITY_TYPE;

/// Base id shared by every group menu link.
pub const GROUP_LINK_BASE_ID: &str = ENTITY_TYPE;

/// Tree id of a group's menu link: `localgov_menu_link_group:<group-id>`.
pub fn group_link_id(group_id: &str) -> String {
    format!("{GROUP_LINK_BASE_ID}:{group_id}")
}

/// Derived links keyed by group id, in the order the groups were given.
pub type DerivedLinks = Vec<(String, MenuLinkDefinition)>;

/// Defaults merged under every group menu link.
///
/// Any field left as `None` falls back to the plain [`MenuLinkDefinition`]
/// default. The identity fields (`id`, `title`, `menu_name`, `parent`,
/// `weight`) are always overridden by the group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseLinkDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl BaseLinkDefinition {
    /// The template group links are discovered with: a non-routed link
    /// provided by this module.
    pub fn group_links() -> Self {
        Self {
            route_name: Some("<nolink>".to_string()),
            provider: Some(GROUP_LINK_BASE_ID.to_string()),
            class: Some("menu_link_default".to_string()),
            ..Self::default()
        }
    }
}

/// The fields a group sets on its menu link. These always win over the
/// template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLinkFields {
    pub id: String,
    pub title: String,
    pub menu_name: String,
    pub parent: String,
    pub weight: i32,
}

impl GroupLinkFields {
    /// Compute the link fields for one group.
    pub fn for_group(group: &MenuLinkGroup) -> Self {
        let (menu_name, parent) = split_menu_link(&group.parent_menu_link);
        if menu_name.is_empty() {
            warn!(
                group = %group.id,
                parent_menu_link = %group.parent_menu_link,
                "group parent menu link has no menu name"
            );
        }

        Self {
            id: group.id.clone(),
            title: group.group_label.clone(),
            menu_name: menu_name.to_string(),
            parent: parent.to_string(),
            weight: group.weight,
        }
    }

    /// Merge the group fields over a template.
    pub fn merge_over(self, base: &BaseLinkDefinition) -> MenuLinkDefinition {
        let mut link = MenuLinkDefinition::new(self.id, self.title, self.menu_name)
            .parent(self.parent)
            .weight(self.weight);

        link.description = base.description.clone();
        link.route_name = base.route_name.clone();
        link.url = base.url.clone();
        link.provider = base.provider.clone().unwrap_or_default();
        link.class = base.class.clone();
        link.enabled = base.enabled.unwrap_or(true);
        link.expanded = base.expanded.unwrap_or(false);
        link.metadata = base.metadata.clone();

        link
    }
}

/// Build the menu link for one group.
pub fn prepare_link_for_group(group: &MenuLinkGroup, base: &BaseLinkDefinition) -> MenuLinkDefinition {
    GroupLinkFields::for_group(group).merge_over(base)
}

/// Produces the synthetic menu links for menu link groups.
#[derive(Debug, Clone)]
pub struct GroupLinkDeriver {
    base: BaseLinkDefinition,
}

impl GroupLinkDeriver {
    /// Create a deriver merging every link over `base`.
    pub fn new(base: BaseLinkDefinition) -> Self {
        Self { base }
    }

    /// The template this deriver merges under each link.
    pub fn base(&self) -> &BaseLinkDefinition {
        &self.base
    }

    /// One link per enabled group, keyed by group id.
    pub fn derive<'a>(&self, groups: impl IntoIterator<Item = &'a MenuLinkGroup>) -> DerivedLinks {
        groups
            .into_iter()
            .filter(|group| group.is_enabled())
            .map(|group| {
                let link = prepare_link_for_group(group, &self.base);
                debug!(
                    group = %group.id,
                    menu = %link.menu_name,
                    parent = %link.parent,
                    "derived group menu link"
                );
                (group.id.clone(), link)
            })
            .collect()
    }
}

impl Default for GroupLinkDeriver {
    fn default() -> Self {
        Self::new(BaseLinkDefinition::group_links())
    }
}
