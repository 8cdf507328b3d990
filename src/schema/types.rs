use serde::{Deserialize, Serialize};

/// Column metadata as reported by a catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMetadata {
    pub name: String,
    /// Database type, possibly parameterized (e.g. `varchar(100)`)
    pub data_type: String,
    pub nullable: bool,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_foreign_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_table: Option<String>,
}

/// Summary row for the table listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    pub name: String,
    pub size_kb: u64,
    pub record_count: u64,
    pub description: String,
}

/// Static column definition for the built-in catalog
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: &'static str,
    pub data_type: &'static str,
    pub nullable: bool,
    pub primary_key: bool,
    /// Referenced table when the column is a foreign key
    pub references: Option<&'static str>,
}

impl ColumnDef {
    /// Create an optional (nullable) column
    pub const fn new(name: &'static str, data_type: &'static str) -> Self {
        Self {
            name,
            data_type,
            nullable: true,
            primary_key: false,
            references: None,
        }
    }

    /// Create a required (non-nullable) column
    pub const fn required(name: &'static str, data_type: &'static str) -> Self {
        Self {
            name,
            data_type,
            nullable: false,
            primary_key: false,
            references: None,
        }
    }

    /// Create a non-nullable primary key column
    pub const fn key(name: &'static str, data_type: &'static str) -> Self {
        Self {
            primary_key: true,
            ..Self::required(name, data_type)
        }
    }

    /// Mark the column as a foreign key into `table`
    pub const fn references(self, table: &'static str) -> Self {
        Self {
            references: Some(table),
            ..self
        }
    }

    pub fn to_metadata(&self) -> ColumnMetadata {
        ColumnMetadata {
            name: self.name.to_string(),
            data_type: self.data_type.to_string(),
            nullable: self.nullable,
            is_primary_key: self.primary_key,
            is_foreign_key: self.references.is_some(),
            referenced_table: self.references.map(str::to_string),
        }
    }
}

/// One row of lookup data, as `(field, value)` pairs
#[derive(Debug, Clone)]
pub struct LookupRow(pub &'static [(&'static str, &'static str)]);

impl LookupRow {
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| *value)
    }
}

/// Table definition for the built-in catalog
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub size_kb: u64,
    pub record_count: u64,
    pub columns: &'static [ColumnDef],
    /// Sample rows served as foreign key options
    pub rows: &'static [LookupRow],
}

impl TableSchema {
    pub fn info(&self) -> TableInfo {
        TableInfo {
            name: self.name.to_string(),
            size_kb: self.size_kb,
            record_count: self.record_count,
            description: self.description.to_string(),
        }
    }

    pub fn column_metadata(&self) -> Vec<ColumnMetadata> {
        self.columns.iter().map(ColumnDef::to_metadata).collect()
    }

    /// Tables this table points at through foreign keys
    pub fn dependencies(&self) -> Vec<&'static str> {
        self.columns.iter().filter_map(|c| c.references).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_def_to_metadata() {
        let col = ColumnDef::required("CustomerID", "int").references("Customers");
        let meta = col.to_metadata();

        assert_eq!(meta.name, "CustomerID");
        assert!(!meta.nullable);
        assert!(meta.is_foreign_key);
        assert!(!meta.is_primary_key);
        assert_eq!(meta.referenced_table.as_deref(), Some("Customers"));
    }

    #[test]
    fn test_column_metadata_json_shape() {
        let json = r#"{"name":"ShipVia","dataType":"int","nullable":true,"isPrimaryKey":false,"isForeignKey":true,"referencedTable":"Shippers"}"#;
        let meta: ColumnMetadata = serde_json::from_str(json).unwrap();

        assert_eq!(meta.data_type, "int");
        assert!(meta.is_foreign_key);
        assert_eq!(meta.referenced_table.as_deref(), Some("Shippers"));
    }
}
