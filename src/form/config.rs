use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::field::FormField;

/// Saved, immutable description of one generated form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    id: String,
    name: String,
    table_name: String,
    description: String,
    fields: Vec<FormField>,
    version: u32,
    created_at: DateTime<Utc>,
}

impl FormConfig {
    /// Only called by `FormSession::to_snapshot` once validation passed
    pub(crate) fn new(
        name: String,
        table_name: String,
        description: String,
        mut fields: Vec<FormField>,
    ) -> Self {
        fields.sort_by_key(|f| f.order);

        Self {
            id: format!("form-{}", Uuid::new_v4()),
            name,
            table_name,
            description,
            fields,
            version: 1,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Fields sorted by their `order`
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Component identifier: the form name with whitespace removed
    pub fn component_name(&self) -> String {
        self.name.split_whitespace().collect()
    }
}
