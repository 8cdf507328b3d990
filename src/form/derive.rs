//! Derivation of form fields from column metadata

use tracing::debug;

use super::field::{FieldOption, FieldType, FormField};
use crate::schema::ColumnMetadata;

/// Display fields used for foreign key options until the user picks others
pub const DEFAULT_FOREIGN_KEY_FIELDS: [&str; 2] = ["id", "name"];

/// Widest `varchar` still rendered as a single-line input
const MAX_SINGLE_LINE_LENGTH: u64 = 255;

/// Build the initial field list for a table, one field per column
pub fn derive_fields(table_name: &str, columns: &[ColumnMetadata]) -> Vec<FormField> {
    let fields: Vec<FormField> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| derive_field(index, column))
        .collect();

    debug!(table = table_name, fields = fields.len(), "derived form fields");
    fields
}

fn derive_field(index: usize, column: &ColumnMetadata) -> FormField {
    let is_foreign_key = column.is_foreign_key;

    FormField {
        id: format!("field-{}", index),
        name: column.name.clone(),
        label: label_for(&column.name),
        field_type: field_type_for(column),
        required: !column.nullable,
        is_primary_key: column.is_primary_key,
        is_foreign_key,
        referenced_table: column.referenced_table.clone(),
        foreign_key_fields: is_foreign_key
            .then(|| DEFAULT_FOREIGN_KEY_FIELDS.iter().map(|f| f.to_string()).collect()),
        options: is_foreign_key.then(|| vec![FieldOption::loading()]),
        order: index,
    }
}

/// Pick the input widget for a column
pub fn field_type_for(column: &ColumnMetadata) -> FieldType {
    if column.is_foreign_key {
        return FieldType::Select;
    }
    field_type_for_data_type(&column.data_type)
}

/// Pick the input widget for a raw database type, ignoring key information
pub fn field_type_for_data_type(data_type: &str) -> FieldType {
    let data_type = data_type.to_lowercase();

    if data_type.contains("bit") {
        FieldType::Switch
    } else if data_type.contains("int") {
        FieldType::Number
    } else if data_type.contains("date") {
        FieldType::Date
    } else if data_type.contains("text")
        || (data_type.contains("varchar")
            && first_integer(&data_type).unwrap_or(0) > MAX_SINGLE_LINE_LENGTH)
    {
        FieldType::Textarea
    } else {
        FieldType::Text
    }
}

/// First run of ASCII digits in `s`; saturates on overflow
fn first_integer(s: &str) -> Option<u64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    Some(digits.parse().unwrap_or(u64::MAX))
}

/// Human readable label for a column name
///
/// Inserts a space before every uppercase letter except the first
/// character, turns underscores into spaces and capitalizes the first
/// character. Acronyms are not special-cased: `CustomerID` becomes
/// `Customer I D`.
pub fn label_for(name: &str) -> String {
    let mut spaced = String::with_capacity(name.len() + 4);

    for (i, c) in name.chars().enumerate() {
        if c == '_' {
            spaced.push(' ');
        } else {
            if i > 0 && c.is_ascii_uppercase() {
                spaced.push(' ');
            }
            spaced.push(c);
        }
    }

    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, data_type: &str) -> ColumnMetadata {
        ColumnMetadata {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            is_primary_key: false,
            is_foreign_key: false,
            referenced_table: None,
        }
    }

    fn foreign_key(name: &str, data_type: &str, table: &str) -> ColumnMetadata {
        ColumnMetadata {
            is_foreign_key: true,
            referenced_table: Some(table.into()),
            ..column(name, data_type)
        }
    }

    #[test]
    fn test_type_precedence() {
        assert_eq!(field_type_for_data_type("bit"), FieldType::Switch);
        assert_eq!(field_type_for_data_type("int"), FieldType::Number);
        assert_eq!(field_type_for_data_type("bigint"), FieldType::Number);
        assert_eq!(field_type_for_data_type("datetime"), FieldType::Date);
        assert_eq!(field_type_for_data_type("text"), FieldType::Textarea);
        assert_eq!(field_type_for_data_type("varchar(1000)"), FieldType::Textarea);
        assert_eq!(field_type_for_data_type("varchar(255)"), FieldType::Text);
        assert_eq!(field_type_for_data_type("varchar(max)"), FieldType::Text);
        assert_eq!(field_type_for_data_type("decimal(10,2)"), FieldType::Text);
        // "bit" wins over "int" even when both appear
        assert_eq!(field_type_for_data_type("bitint"), FieldType::Switch);
    }

    #[test]
    fn test_type_is_case_insensitive() {
        assert_eq!(field_type_for_data_type("DATETIME2"), FieldType::Date);
        assert_eq!(field_type_for_data_type("NVARCHAR(4000)"), FieldType::Textarea);
    }

    #[test]
    fn test_foreign_key_overrides_type() {
        assert_eq!(
            field_type_for(&foreign_key("Flag", "bit", "Flags")),
            FieldType::Select
        );
        assert_eq!(
            field_type_for(&foreign_key("Notes", "text", "Notes")),
            FieldType::Select
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(label_for("CompanyName"), "Company Name");
        assert_eq!(label_for("contact_title"), "Contact title");
        assert_eq!(label_for("CustomerID"), "Customer I D");
        assert_eq!(label_for("IsActive"), "Is Active");
        assert_eq!(label_for("status"), "Status");
        assert_eq!(label_for(""), "");
    }

    #[test]
    fn test_derive_fields() {
        let columns = vec![
            ColumnMetadata {
                nullable: false,
                is_primary_key: true,
                ..column("OrderID", "int")
            },
            foreign_key("ShipVia", "int", "Shippers"),
            column("ShipName", "varchar(100)"),
        ];

        let fields = derive_fields("Orders", &columns);
        assert_eq!(fields.len(), 3);

        let id = &fields[0];
        assert_eq!(id.id, "field-0");
        assert!(id.required);
        assert!(id.is_primary_key);
        assert!(id.foreign_key_fields.is_none());
        assert!(id.options.is_none());

        let ship_via = &fields[1];
        assert_eq!(ship_via.field_type, FieldType::Select);
        assert!(!ship_via.required);
        assert_eq!(ship_via.referenced_table.as_deref(), Some("Shippers"));
        assert_eq!(
            ship_via.foreign_key_fields,
            Some(vec!["id".to_string(), "name".to_string()])
        );
        assert_eq!(ship_via.options, Some(vec![FieldOption::loading()]));

        let orders: Vec<usize> = fields.iter().map(|f| f.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_derive_empty() {
        assert!(derive_fields("Empty", &[]).is_empty());
    }
}
