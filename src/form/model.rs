//! Editing session for one form

use tracing::{debug, warn};

use super::config::FormConfig;
use super::derive::derive_fields;
use super::field::{FieldChanges, FieldOption, FormField};
use crate::error::{FormError, Result};
use crate::nit::{verification_digit_field, VerificationDigitField};
use crate::schema::{Catalog, ColumnMetadata};

/// Mutable form definition being edited
///
/// Owns the field list for one table. The selected field is tracked by id so
/// reorders and edits never leave it pointing at a stale copy.
#[derive(Debug, Clone)]
pub struct FormSession {
    table_name: String,
    name: String,
    description: String,
    fields: Vec<FormField>,
    selected: Option<String>,
}

impl FormSession {
    /// Start a session from already derived fields
    pub fn new(table_name: impl Into<String>, fields: Vec<FormField>) -> Self {
        let table_name = table_name.into();
        Self {
            name: format!("{} Form", table_name),
            table_name,
            description: String::new(),
            fields,
            selected: None,
        }
    }

    /// Derive a fresh field list for `table_name`
    ///
    /// Switching tables always starts over; unsaved edits are not merged.
    pub fn for_table(table_name: impl Into<String>, columns: &[ColumnMetadata]) -> Self {
        let table_name = table_name.into();
        let fields = derive_fields(&table_name, columns);
        Self::new(table_name, fields)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Fields in list position order
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Find a field by column name (case-insensitive)
    pub fn field_by_name(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Focus a field for editing; unknown ids are ignored
    pub fn select_field(&mut self, id: &str) {
        if self.field(id).is_some() {
            self.selected = Some(id.to_string());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_field(&self) -> Option<&FormField> {
        self.selected.as_deref().and_then(|id| self.field(id))
    }

    /// Apply a partial update to one field
    ///
    /// Renaming a key field or retyping a foreign key is rejected and leaves
    /// the field untouched. Unknown ids are a no-op.
    pub fn update_field(&mut self, id: &str, changes: FieldChanges) -> Result<()> {
        let Some(field) = self.fields.iter_mut().find(|f| f.id == id) else {
            return Ok(());
        };

        field.check_changes(&changes)?;
        field.apply(changes);
        Ok(())
    }

    /// Apply a partial update to the selected field, if any
    pub fn update_selected(&mut self, changes: FieldChanges) -> Result<()> {
        match self.selected.clone() {
            Some(id) => self.update_field(&id, changes),
            None => Ok(()),
        }
    }

    /// Replace the options of a field, e.g. once foreign key rows are loaded
    pub fn set_field_options(&mut self, id: &str, options: Vec<FieldOption>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.id == id) {
            field.options = Some(options);
        }
    }

    /// Load option rows for every foreign key field from `catalog`
    ///
    /// Failed lookups keep the loading placeholder.
    pub fn populate_foreign_key_options(&mut self, catalog: &dyn Catalog) {
        for field in self.fields.iter_mut().filter(|f| f.is_foreign_key) {
            let Some(table) = field.referenced_table.as_deref() else {
                continue;
            };
            let display_fields = field.foreign_key_fields.clone().unwrap_or_default();

            match catalog.fetch_foreign_key_options(table, &display_fields) {
                Ok(options) => {
                    debug!(field = %field.name, table, options = options.len(), "loaded options");
                    field.options = Some(options);
                }
                Err(e) => {
                    warn!(field = %field.name, table, error = %e, "failed to load options");
                }
            }
        }
    }

    /// Move the field at `source` to `destination` and renumber every field
    ///
    /// A missing or out of range destination (a drop outside the list) does
    /// nothing.
    pub fn reorder(&mut self, source: usize, destination: Option<usize>) {
        let Some(destination) = destination else {
            return;
        };
        if source >= self.fields.len() || destination >= self.fields.len() {
            return;
        }

        let field = self.fields.remove(source);
        self.fields.insert(destination, field);

        for (index, field) in self.fields.iter_mut().enumerate() {
            field.order = index;
        }
    }

    /// Check the form can be saved
    pub fn validate_for_save(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FormError::EmptyName);
        }
        if self.fields.is_empty() {
            return Err(FormError::NoFields);
        }
        Ok(())
    }

    /// Freeze the current state into a [`FormConfig`]
    pub fn to_snapshot(&self) -> Result<FormConfig> {
        self.validate_for_save()?;

        Ok(FormConfig::new(
            self.name.clone(),
            self.table_name.clone(),
            self.description.clone(),
            self.fields.clone(),
        ))
    }

    /// Transient verification digit row for the current fields
    pub fn verification_digit(&self, nit_value: Option<&str>) -> Option<VerificationDigitField> {
        verification_digit_field(&self.fields, nit_value)
    }
}
