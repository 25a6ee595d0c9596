//! Error types.

use thiserror::Error;

/// Menu link group errors.
#[derive(Debug, Error)]
pub enum GroupError {
    #[error("{field}: '{value}' is not a menu link (expected menu-name:menu-link-id)")]
    InvalidMenuLink { field: &'static str, value: String },

    #[error("invalid machine name '{0}': only lowercase letters, digits and underscores are allowed")]
    InvalidMachineName(String),

    #[error("invalid label: {0}")]
    InvalidLabel(String),

    #[error("menu link group '{0}' not found")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl GroupError {
    /// Name of the form field the error belongs to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            GroupError::InvalidMenuLink { field, .. } => Some(*field),
            GroupError::InvalidMachineName(_) => Some("id"),
            GroupError::InvalidLabel(_) => Some("group_label"),
            GroupError::NotFound(_) | GroupError::Storage(_) => None,
        }
    }
}

/// Result type alias using GroupError.
pub type GroupResult<T> = Result<T, GroupError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn field_mapping() {
        let err = GroupError::InvalidMenuLink {
            field: "parent_menu_link",
            value: "nope".to_string(),
        };
        assert_eq!(err.field(), Some("parent_menu_link"));
        assert!(err.to_string().contains("'nope'"));

        assert_eq!(
            GroupError::InvalidMachineName("A-b".to_string()).field(),
            Some("id")
        );
        assert_eq!(GroupError::NotFound("x".to_string()).field(), None);
    }
}
