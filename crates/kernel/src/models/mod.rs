//! Data models.

pub mod menu_link_group;

pub use menu_link_group::MenuLinkGroup;
