//! Form and form element types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A complete form definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    /// Unique form identifier (e.g., "localgov_menu_link_group_add_form").
    pub form_id: String,

    /// Unique build ID for this form instance.
    pub form_build_id: String,

    /// HTTP method ("post" or "get").
    pub method: String,

    /// Form elements keyed by name.
    pub elements: BTreeMap<String, FormElement>,

    /// Optional form title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Form {
    /// Create a new form with the given ID.
    pub fn new(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            form_build_id: uuid::Uuid::now_v7().to_string(),
            method: "post".to_string(),
            elements: BTreeMap::new(),
            title: None,
        }
    }

    /// Set the form title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add an element to the form.
    pub fn element(mut self, name: impl Into<String>, element: FormElement) -> Self {
        self.elements.insert(name.into(), element);
        self
    }

    /// Get an element by name.
    pub fn get_element(&self, name: &str) -> Option<&FormElement> {
        self.elements.get(name)
    }
}

/// A form element definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormElement {
    /// Element type with type-specific configuration.
    #[serde(flatten)]
    pub element_type: ElementType,

    /// Element title/label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Element description/help text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    /// Whether this field is required.
    #[serde(default)]
    pub required: bool,

    /// Sort weight (lower = appears first).
    #[serde(default)]
    pub weight: i32,

    /// Whether this element is disabled.
    #[serde(default)]
    pub disabled: bool,

    /// Prefix markup (displayed before element).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Suffix markup (displayed after element).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl FormElement {
    /// Create a textfield element.
    pub fn textfield() -> Self {
        Self::new(ElementType::Textfield { max_length: None })
    }

    /// Create a number element.
    pub fn number() -> Self {
        Self::new(ElementType::Number)
    }

    /// Create a select element.
    pub fn select(options: Vec<(String, String)>) -> Self {
        Self::new(ElementType::Select {
            options,
            multiple: false,
            size: None,
        })
    }

    /// Create a multi-select element.
    pub fn multi_select(options: Vec<(String, String)>) -> Self {
        Self::new(ElementType::Select {
            options,
            multiple: true,
            size: None,
        })
    }

    /// Create a checkbox element.
    pub fn checkbox() -> Self {
        Self::new(ElementType::Checkbox)
    }

    /// Create a machine name element generated from another element.
    pub fn machine_name(source: impl Into<String>) -> Self {
        Self::new(ElementType::MachineName {
            source: source.into(),
        })
    }

    /// Create a submit button.
    pub fn submit(value: impl Into<String>) -> Self {
        Self::new(ElementType::Submit {
            value: value.into(),
        })
    }

    /// Create a new element with the given type.
    fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            title: None,
            description: None,
            default_value: None,
            required: false,
            weight: 0,
            disabled: false,
            prefix: None,
            suffix: None,
        }
    }

    /// Set the element title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the element description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the default value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Mark as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the weight.
    pub fn weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Set max length for textfield.
    pub fn max_length(mut self, max: usize) -> Self {
        if let ElementType::Textfield { ref mut max_length } = self.element_type {
            *max_length = Some(max);
        }
        self
    }

    /// Set the visible row count of a select.
    pub fn size(mut self, rows: u32) -> Self {
        if let ElementType::Select { ref mut size, .. } = self.element_type {
            *size = Some(rows);
        }
        self
    }

    /// Mark as disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Set prefix markup.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set suffix markup.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Options of a select element.
    pub fn options(&self) -> &[(String, String)] {
        match &self.element_type {
            ElementType::Select { options, .. } => options,
            _ => &[],
        }
    }
}

/// Element type variants with type-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementType {
    /// Single-line text input.
    Textfield {
        #[serde(skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },

    /// Integer input.
    Number,

    /// Dropdown select.
    Select {
        options: Vec<(String, String)>,
        #[serde(default)]
        multiple: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<u32>,
    },

    /// Single checkbox.
    Checkbox,

    /// Machine name derived from the element named by `source`.
    MachineName { source: String },

    /// Submit button.
    Submit { value: String },
}
