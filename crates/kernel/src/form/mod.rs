//! Admin forms for menu link groups.
//!
//! Forms are declared with typed elements, validated against submitted
//! [`FormState`] values and answered with a [`FormResult`]:
//! - `types` holds the form and element definitions
//! - `menu_parent` builds the menu link select options
//! - `menu_link_group` is the add/edit form itself

mod menu_link_group;
mod menu_parent;
mod state;
mod types;

pub use menu_link_group::{
    ADD_FORM_ID, COLLECTION_PATH, EDIT_FORM_ID, ENTITY_ID_PREFIX, MenuLinkGroupForm, form_values,
};
pub use menu_parent::parent_select_options;
pub use state::{FormResult, FormState, ValidationError};
pub use types::{ElementType, Form, FormElement};
