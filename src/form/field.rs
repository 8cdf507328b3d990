use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FormError, Result};

/// Input widget rendered for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Date,
    Switch,
    Select,
}

impl FieldType {
    pub const ALL: [FieldType; 6] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Date,
        FieldType::Switch,
        FieldType::Select,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Switch => "switch",
            FieldType::Select => "select",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown field type: {}", s))
    }
}

/// Option shown by a select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Placeholder shown until foreign key options are resolved
    pub fn loading() -> Self {
        Self::new("Loading...", "loading")
    }
}

/// Editable field descriptor derived from a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub id: String,
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_table: Option<String>,
    /// Columns of the referenced table concatenated into option labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    pub order: usize,
}

impl FormField {
    /// Key columns keep the column name they were derived from
    pub fn is_name_locked(&self) -> bool {
        self.is_primary_key || self.is_foreign_key
    }

    /// Foreign keys always render as a select
    pub fn is_type_locked(&self) -> bool {
        self.is_foreign_key
    }

    /// Check that `changes` only touch attributes this field lets the user edit
    pub fn check_changes(&self, changes: &FieldChanges) -> Result<()> {
        if self.is_name_locked() {
            if let Some(name) = &changes.name {
                if *name != self.name {
                    return Err(FormError::LockedAttribute {
                        field: self.name.clone(),
                        attribute: "name",
                    });
                }
            }
        }

        if self.is_type_locked() {
            if let Some(field_type) = changes.field_type {
                if field_type != self.field_type {
                    return Err(FormError::LockedAttribute {
                        field: self.name.clone(),
                        attribute: "type",
                    });
                }
            }
        }

        Ok(())
    }

    /// Apply changes without checking locks
    pub(crate) fn apply(&mut self, changes: FieldChanges) {
        let FieldChanges {
            name,
            label,
            field_type,
            required,
            foreign_key_fields,
            options,
        } = changes;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(label) = label {
            self.label = label;
        }
        if let Some(field_type) = field_type {
            self.field_type = field_type;
        }
        if let Some(required) = required {
            self.required = required;
        }
        if let Some(fields) = foreign_key_fields {
            self.foreign_key_fields = Some(fields);
        }
        if let Some(options) = options {
            self.options = Some(options);
        }
    }
}

/// Partial update for a [`FormField`]; `None` leaves the attribute as is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldChanges {
    pub name: Option<String>,
    pub label: Option<String>,
    pub field_type: Option<FieldType>,
    pub required: Option<bool>,
    pub foreign_key_fields: Option<Vec<String>>,
    pub options: Option<Vec<FieldOption>>,
}

impl FieldChanges {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn field_type(field_type: FieldType) -> Self {
        Self {
            field_type: Some(field_type),
            ..Default::default()
        }
    }

    pub fn required(required: bool) -> Self {
        Self {
            required: Some(required),
            ..Default::default()
        }
    }

    /// Parse a comma-separated display field list, as typed in the editor
    pub fn display_fields(input: &str) -> Self {
        let fields = input
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            foreign_key_fields: Some(fields),
            ..Default::default()
        }
    }
}
