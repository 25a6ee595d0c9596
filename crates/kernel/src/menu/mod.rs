//! Menu link tree and menu link groups.
//!
//! Providers contribute menu links; every enabled menu link group adds one
//! synthetic link and pulls its child links below it:
//! - `tree` holds every discovered link, keyed by link id
//! - `deriver` builds the synthetic group links
//! - `grouper` reparents the child links of a group
//! - `discovery` runs the whole pass

pub mod deriver;
pub mod discovery;
pub mod grouper;
pub mod link_id;
mod tree;

pub use deriver::{BaseLinkDefinition, GROUP_LINK_BASE_ID, GroupLinkDeriver, group_link_id};
pub use grouper::{MenuLinkGrouper, fix_menu_for_all_child_links};
pub use link_id::split_menu_link;
pub use tree::{LINKS_FILE_SUFFIX, MenuLinkDefinition, MenuLinkTree};
