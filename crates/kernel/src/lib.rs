//! Menu link groups.
//!
//! A menu link group gathers menu links from any menu under one synthetic
//! menu link. This library exposes the group records, their storage, the
//! menu discovery pass and the admin form. The `menu-link-group` binary
//! drives them from the command line.

pub mod config;
pub mod config_storage;
pub mod error;
pub mod form;
pub mod menu;
pub mod models;

pub use error::{GroupError, GroupResult};
pub use menu::{GroupLinkDeriver, MenuLinkDefinition, MenuLinkGrouper, MenuLinkTree};
pub use models::MenuLinkGroup;
