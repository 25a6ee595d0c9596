//! Add/edit form for menu link groups.
//!
//! New groups get the `localgov_menu_link_group_` id prefix. Child links are
//! moved into the parent link's menu before every save. The id of an
//! existing group cannot change.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use super::menu_parent::parent_select_options;
use super::state::{FormResult, FormState, ValidationError};
use super::types::{Form, FormElement};
use crate::config_storage::{GroupStorage, SaveStatus};
use crate::error::{GroupError, GroupResult};
use crate::menu::link_id::{is_composite, split_menu_link};
use crate::menu::{MenuLinkTree, fix_menu_for_all_child_links, group_link_id};
use crate::models::MenuLinkGroup;
use crate::models::menu_link_group::{MAX_LABEL_LENGTH, validate_machine_name};

/// Prefix of every id created through the form.
pub const ENTITY_ID_PREFIX: &str = "localgov_menu_link_group_";

/// Form id for new groups.
pub const ADD_FORM_ID: &str = "localgov_menu_link_group_add_form";

/// Form id for existing groups.
pub const EDIT_FORM_ID: &str = "localgov_menu_link_group_edit_form";

/// Where the form redirects after saving or deleting.
pub const COLLECTION_PATH: &str = "/admin/structure/menu-link-group";

/// Rows shown by the child links select.
const CHILD_SELECT_SIZE: u32 = 20;

/// Add/edit form bound to one group.
pub struct MenuLinkGroupForm {
    storage: Arc<dyn GroupStorage>,
    entity: MenuLinkGroup,
    is_new: bool,
}

impl MenuLinkGroupForm {
    /// Form for a new, enabled group.
    pub fn create(storage: Arc<dyn GroupStorage>) -> Self {
        Self {
            storage,
            entity: MenuLinkGroup::new("", ""),
            is_new: true,
        }
    }

    /// Form for an existing group.
    pub async fn edit(storage: Arc<dyn GroupStorage>, id: &str) -> GroupResult<Self> {
        let entity = storage
            .load(id)
            .await?
            .ok_or_else(|| GroupError::NotFound(id.to_string()))?;

        Ok(Self {
            storage,
            entity,
            is_new: false,
        })
    }

    /// Edit form for a stored group, matched with or without the machine name
    /// prefix; add form when neither is stored.
    pub async fn open(storage: Arc<dyn GroupStorage>, id: &str) -> GroupResult<Self> {
        let prefixed = if id.starts_with(ENTITY_ID_PREFIX) {
            id.to_string()
        } else {
            format!("{ENTITY_ID_PREFIX}{id}")
        };

        for candidate in [id, prefixed.as_str()] {
            if storage.exists(candidate).await? {
                return Self::edit(storage, candidate).await;
            }
        }
        Ok(Self::create(storage))
    }

    /// The group being edited.
    pub fn entity(&self) -> &MenuLinkGroup {
        &self.entity
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn form_id(&self) -> &'static str {
        if self.is_new { ADD_FORM_ID } else { EDIT_FORM_ID }
    }

    /// Build the form, offering every link in `tree` as parent or child.
    pub fn build(&self, tree: &MenuLinkTree) -> Form {
        let group = &self.entity;

        // A group cannot sit below its own link. Its current children do, and
        // stay selectable; only the link itself is withheld from them.
        let own_link = (!self.is_new).then(|| group_link_id(&group.id));
        let options = parent_select_options(tree, own_link.as_deref());
        let child_options: Vec<_> = parent_select_options(tree, None)
            .into_iter()
            .filter(|(key, _)| own_link.as_deref() != Some(split_menu_link(key).1))
            .collect();

        let mut id = FormElement::machine_name("group_label")
            .title("Machine-readable name")
            .required()
            .weight(1);
        if self.is_new {
            id = id
                .prefix(format!("<span dir=\"ltr\">{ENTITY_ID_PREFIX}"))
                .suffix("</span>&lrm;");
        } else {
            id = id.default_value(group.id.as_str()).disabled();
        }

        let mut parent = FormElement::select(options)
            .title("Parent menu link")
            .description(
                "The menu link for this group will appear as a child of this menu link. Example: Add content.",
            )
            .required()
            .weight(4);
        if !group.parent_menu_link.is_empty() {
            parent = parent.default_value(group.parent_menu_link.as_str());
        }

        let children = fix_menu_for_all_child_links(&group.child_menu_links, &group.parent_menu_link);

        Form::new(self.form_id())
            .title(if self.is_new {
                "Add menu link group".to_string()
            } else {
                format!("Edit {}", group.label())
            })
            .element(
                "group_label",
                FormElement::textfield()
                    .title("Group name")
                    .description("It will act as label of the menu link for this group.")
                    .default_value(group.group_label.as_str())
                    .max_length(MAX_LABEL_LENGTH)
                    .required(),
            )
            .element("id", id)
            .element(
                "status",
                FormElement::checkbox()
                    .title("Enabled")
                    .default_value(group.status)
                    .weight(2),
            )
            .element(
                "weight",
                FormElement::number()
                    .title("Weight of its menu link")
                    .default_value(group.weight)
                    .weight(3),
            )
            .element("parent_menu_link", parent)
            .element(
                "child_menu_links",
                FormElement::multi_select(child_options)
                    .title("Child menu links")
                    .description(
                        "These will appear as children of the menu link for this group. Example: Article, Basic page.",
                    )
                    .default_value(children)
                    .size(CHILD_SELECT_SIZE)
                    .weight(5),
            )
            .element("submit", FormElement::submit("Save").weight(100))
    }

    /// Validate a submission.
    ///
    /// The child links are moved into the parent's menu and, for a new
    /// group, the `id` value gains its prefix. Both are written back into
    /// `state`.
    pub async fn validate(&self, state: &mut FormState) -> GroupResult<Vec<ValidationError>> {
        let mut errors = Vec::new();

        match state.get_str("group_label") {
            None => errors.push(ValidationError::field("group_label", "Group name field is required.")),
            Some(label) if label.chars().count() > MAX_LABEL_LENGTH => errors.push(ValidationError::field(
                "group_label",
                format!("Group name cannot be longer than {MAX_LABEL_LENGTH} characters."),
            )),
            Some(_) => {}
        }

        if self.is_new {
            self.validate_new_id(state, &mut errors).await?;
        } else {
            // Disabled on edit; whatever was submitted is ignored.
            state.set_value("id", self.entity.id.as_str());
        }

        if state.get_value("weight").is_some() {
            match state.get_i64("weight") {
                None => errors.push(ValidationError::field("weight", "Weight of its menu link must be a number.")),
                Some(w) if i32::try_from(w).is_err() => errors.push(ValidationError::field(
                    "weight",
                    format!("Weight of its menu link must be between {} and {}.", i32::MIN, i32::MAX),
                )),
                Some(_) => {}
            }
        }

        let parent = state.get_str("parent_menu_link").map(str::to_string);
        match parent.as_deref() {
            None => errors.push(ValidationError::field(
                "parent_menu_link",
                "Parent menu link field is required.",
            )),
            Some(p) if !is_composite(p) => errors.push(ValidationError::field(
                "parent_menu_link",
                "Parent menu link must be chosen from the list.",
            )),
            Some(_) => {}
        }

        if let Some(parent) = parent.as_deref().filter(|p| is_composite(p)) {
            let children = fix_menu_for_all_child_links(&state.get_strings("child_menu_links"), parent);
            state.set_value("child_menu_links", children);
        }

        // Field checks passed; the record rules catch anything left.
        if errors.is_empty()
            && let Err(e) = self.entity_from_state(state).validate()
        {
            let message = e.to_string();
            errors.push(match e.field() {
                Some(field) => ValidationError::field(field, message),
                None => ValidationError::form(message),
            });
        }

        debug!(form_id = self.form_id(), errors = errors.len(), "validated menu link group form");
        Ok(errors)
    }

    async fn validate_new_id(&self, state: &mut FormState, errors: &mut Vec<ValidationError>) -> GroupResult<()> {
        let Some(raw) = state.get_str("id").map(str::to_string) else {
            errors.push(ValidationError::field("id", "Machine-readable name field is required."));
            return Ok(());
        };

        if validate_machine_name(&raw).is_err() {
            errors.push(ValidationError::field(
                "id",
                "The machine-readable name must contain only lowercase letters, numbers, and underscores.",
            ));
            return Ok(());
        }

        let id = format!("{ENTITY_ID_PREFIX}{raw}");
        if self.exists(&id).await? {
            errors.push(ValidationError::field(
                "id",
                "The machine-readable name is already in use. It must be unique.",
            ));
        }
        state.set_value("id", id);
        Ok(())
    }

    /// Save a validated submission.
    pub async fn submit(&mut self, state: &FormState) -> GroupResult<FormResult> {
        self.entity = self.entity_from_state(state);

        let status = self.storage.save(&self.entity).await?;
        self.is_new = false;

        let label = self.entity.label();
        let message = match status {
            SaveStatus::New => format!("The {label} LocalGov menu link group created."),
            SaveStatus::Updated => format!("The {label} LocalGov menu link group has been updated."),
        };
        info!(group = %self.entity.id, ?status, "menu link group saved");

        Ok(FormResult::Redirect {
            to: COLLECTION_PATH.to_string(),
            messages: vec![message],
        })
    }

    /// Validate, then save if the submission is valid.
    pub async fn process(&mut self, mut state: FormState) -> GroupResult<FormResult> {
        let errors = self.validate(&mut state).await?;
        if !errors.is_empty() {
            return Ok(FormResult::ValidationFailed(errors));
        }
        self.submit(&state).await
    }

    /// Whether a group with this id is already stored.
    pub async fn exists(&self, id: &str) -> GroupResult<bool> {
        Ok(self.storage.exists(id).await?)
    }

    /// Delete the group this form is bound to.
    pub async fn delete(self) -> GroupResult<FormResult> {
        if self.is_new || !self.storage.delete(&self.entity.id).await? {
            return Err(GroupError::NotFound(self.entity.id));
        }

        info!(group = %self.entity.id, "menu link group deleted");
        Ok(FormResult::Redirect {
            to: COLLECTION_PATH.to_string(),
            messages: vec![format!(
                "The LocalGov menu link group {} has been deleted.",
                self.entity.label()
            )],
        })
    }

    fn entity_from_state(&self, state: &FormState) -> MenuLinkGroup {
        let mut group = self.entity.clone();

        if let Some(id) = state.get_str("id") {
            group.id = id.to_string();
        }
        group.group_label = state.get_str("group_label").unwrap_or_default().to_string();
        group.status = state.get_bool("status").unwrap_or(false);
        group.weight = state
            .get_i64("weight")
            .and_then(|w| i32::try_from(w).ok())
            .unwrap_or(0);
        group.parent_menu_link = state.get_str("parent_menu_link").unwrap_or_default().to_string();
        group.child_menu_links = state.get_strings("child_menu_links");
        group
    }
}

/// Submitted values for a group, as the form would post them.
pub fn form_values(group: &MenuLinkGroup) -> Vec<(&'static str, Value)> {
    vec![
        ("id", Value::from(group.id.as_str())),
        ("group_label", Value::from(group.group_label.as_str())),
        ("status", Value::from(group.status)),
        ("weight", Value::from(group.weight)),
        ("parent_menu_link", Value::from(group.parent_menu_link.as_str())),
        ("child_menu_links", Value::from(group.child_menu_links.clone())),
    ]
}
