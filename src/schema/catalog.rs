//! Metadata sources feeding the form builder

use anyhow::{bail, Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::tables::{get_table, ALL_TABLES};
use super::types::{ColumnMetadata, TableInfo};
use crate::form::FieldOption;

/// Separator between display fields in an option label
const LABEL_SEPARATOR: &str = " - ";

/// Upper bound on rows loaded into a select
const MAX_OPTION_ROWS: usize = 500;

/// Source of table and column metadata
pub trait Catalog {
    fn list_tables(&self) -> Result<Vec<TableInfo>>;

    /// Columns of `table` in declaration order; empty for unknown tables
    fn fetch_columns(&self, table: &str) -> Result<Vec<ColumnMetadata>>;

    /// Rows of `table` as select options, labelled by `display_fields`
    fn fetch_foreign_key_options(
        &self,
        table: &str,
        display_fields: &[String],
    ) -> Result<Vec<FieldOption>>;
}

/// Turn one row into an option: `id` is the value, display fields form the label
fn option_from_row(
    lookup: impl Fn(&str) -> Option<String>,
    value_field: &str,
    display_fields: &[String],
) -> Option<FieldOption> {
    let value = lookup(value_field)?;
    let parts: Vec<String> = display_fields.iter().filter_map(|f| lookup(f)).collect();
    let label = if parts.is_empty() {
        value.clone()
    } else {
        parts.join(LABEL_SEPARATOR)
    };
    Some(FieldOption { label, value })
}

// =============================================================================
// Built-in catalog
// =============================================================================

/// Catalog backed by the built-in demo tables
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticCatalog;

impl StaticCatalog {
    pub fn new() -> Self {
        Self
    }
}

impl Catalog for StaticCatalog {
    fn list_tables(&self) -> Result<Vec<TableInfo>> {
        Ok(ALL_TABLES.iter().map(|t| t.info()).collect())
    }

    fn fetch_columns(&self, table: &str) -> Result<Vec<ColumnMetadata>> {
        Ok(get_table(table)
            .map(|t| t.column_metadata())
            .unwrap_or_default())
    }

    fn fetch_foreign_key_options(
        &self,
        table: &str,
        display_fields: &[String],
    ) -> Result<Vec<FieldOption>> {
        let Some(schema) = get_table(table) else {
            return Ok(Vec::new());
        };

        Ok(schema
            .rows
            .iter()
            .filter_map(|row| {
                option_from_row(|f| row.get(f).map(str::to_string), "id", display_fields)
            })
            .collect())
    }
}

// =============================================================================
// SQLite catalog
// =============================================================================

/// Catalog reading a live SQLite database
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    pub fn open(db_path: &Path) -> Result<Self> {
        if !db_path.exists() {
            bail!("Database not found: {:?}", db_path);
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        Ok(Self { conn })
    }

    /// Wrap an existing connection
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Resolve `table` to its stored spelling
    fn resolve_table(&self, table: &str) -> Result<Option<String>> {
        Ok(self
            .table_names()?
            .into_iter()
            .find(|name| name.eq_ignore_ascii_case(table)))
    }

    fn foreign_keys(&self, table: &str) -> Result<HashMap<String, String>> {
        let sql = format!("PRAGMA foreign_key_list({})", quote_ident(table));
        let mut stmt = self.conn.prepare(&sql)?;
        let pairs = stmt
            .query_map([], |row| {
                let referenced: String = row.get("table")?;
                let column: String = row.get("from")?;
                Ok((column, referenced))
            })?
            .collect::<rusqlite::Result<HashMap<_, _>>>()?;
        Ok(pairs)
    }

    fn primary_key(&self, table: &str) -> Result<Option<String>> {
        Ok(self
            .fetch_columns(table)?
            .into_iter()
            .find(|c| c.is_primary_key)
            .map(|c| c.name))
    }
}

impl Catalog for SqliteCatalog {
    fn list_tables(&self) -> Result<Vec<TableInfo>> {
        let mut tables = Vec::new();

        for name in self.table_names()? {
            let count_sql = format!("SELECT COUNT(*) FROM {}", quote_ident(&name));
            let record_count: i64 = self
                .conn
                .query_row(&count_sql, [], |row| row.get(0))
                .with_context(|| format!("Failed to count rows in {}", name))?;

            tables.push(TableInfo {
                name,
                size_kb: 0,
                record_count: record_count.max(0) as u64,
                description: String::new(),
            });
        }

        Ok(tables)
    }

    fn fetch_columns(&self, table: &str) -> Result<Vec<ColumnMetadata>> {
        let Some(table) = self.resolve_table(table)? else {
            return Ok(Vec::new());
        };

        let foreign_keys = self.foreign_keys(&table)?;
        let sql = format!("PRAGMA table_info({})", quote_ident(&table));
        let mut stmt = self.conn.prepare(&sql)?;

        let columns = stmt
            .query_map([], |row| {
                let name: String = row.get("name")?;
                let data_type: String = row.get("type")?;
                let not_null: i64 = row.get("notnull")?;
                let pk: i64 = row.get("pk")?;
                Ok((name, data_type, not_null != 0, pk > 0))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .map(|(name, data_type, not_null, is_primary_key)| {
                let referenced_table = foreign_keys.get(&name).cloned();
                ColumnMetadata {
                    is_foreign_key: referenced_table.is_some(),
                    referenced_table,
                    nullable: !not_null && !is_primary_key,
                    is_primary_key,
                    data_type: data_type.to_lowercase(),
                    name,
                }
            })
            .collect::<Vec<_>>();

        debug!(table = %table, columns = columns.len(), "read table structure");
        Ok(columns)
    }

    fn fetch_foreign_key_options(
        &self,
        table: &str,
        display_fields: &[String],
    ) -> Result<Vec<FieldOption>> {
        let Some(table) = self.resolve_table(table)? else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "SELECT * FROM {} LIMIT {}",
            quote_ident(&table),
            MAX_OPTION_ROWS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let column_names: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        // `id` when the table has one, its primary key otherwise
        let value_field = if column_names.iter().any(|c| c.eq_ignore_ascii_case("id")) {
            "id".to_string()
        } else {
            match self.primary_key(&table)? {
                Some(pk) => pk,
                None => bail!("Table {} has no id or primary key column", table),
            }
        };

        let mut rows = stmt.query([])?;
        let mut options = Vec::new();

        while let Some(row) = rows.next()? {
            let mut values: HashMap<String, String> = HashMap::new();
            for (idx, name) in column_names.iter().enumerate() {
                if let Some(text) = value_to_string(row.get_ref(idx)?) {
                    values.insert(name.to_lowercase(), text);
                }
            }

            let lookup = |field: &str| values.get(&field.to_lowercase()).cloned();
            if let Some(option) = option_from_row(lookup, &value_field, display_fields) {
                options.push(option);
            }
        }

        Ok(options)
    }
}

fn value_to_string(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(_) => None,
    }
}

/// Quote an SQLite identifier
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> SqliteCatalog {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE shippers (
                 id INTEGER PRIMARY KEY,
                 name TEXT NOT NULL,
                 phone VARCHAR(24)
             );
             CREATE TABLE orders (
                 order_id INTEGER PRIMARY KEY,
                 ship_via INTEGER REFERENCES shippers(id),
                 notes VARCHAR(2000),
                 shipped_at DATETIME,
                 paid BIT NOT NULL
             );
             INSERT INTO shippers (id, name, phone) VALUES
                 (1, 'Speedy Express', '555-0101'),
                 (2, 'United Package', NULL);",
        )
        .unwrap();
        SqliteCatalog::from_connection(conn)
    }

    #[test]
    fn test_static_catalog_columns() {
        let catalog = StaticCatalog::new();
        let columns = catalog.fetch_columns("Customers").unwrap();
        assert_eq!(columns.len(), 12);
        assert!(columns[0].is_primary_key);
        assert!(catalog.fetch_columns("Unknown").unwrap().is_empty());
    }

    #[test]
    fn test_static_catalog_options() {
        let catalog = StaticCatalog::new();
        let fields = vec!["id".to_string(), "name".to_string(), "country".to_string()];
        let options = catalog.fetch_foreign_key_options("Suppliers", &fields).unwrap();

        assert_eq!(options[1], FieldOption::new("2 - Supplier B - Mexico", "2"));
        assert!(catalog
            .fetch_foreign_key_options("Nowhere", &fields)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_option_label_falls_back_to_value() {
        let catalog = StaticCatalog::new();
        let options = catalog
            .fetch_foreign_key_options("Shippers", &["missing".to_string()])
            .unwrap();
        assert_eq!(options[0], FieldOption::new("1", "1"));
    }

    #[test]
    fn test_sqlite_columns() {
        let catalog = fixture();
        let columns = catalog.fetch_columns("ORDERS").unwrap();
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["order_id", "ship_via", "notes", "shipped_at", "paid"]);

        assert!(columns[0].is_primary_key);
        assert!(!columns[0].nullable);
        assert!(columns[1].is_foreign_key);
        assert_eq!(columns[1].referenced_table.as_deref(), Some("shippers"));
        assert!(columns[1].nullable);
        assert_eq!(columns[2].data_type, "varchar(2000)");
        assert!(!columns[4].nullable);
    }

    #[test]
    fn test_sqlite_list_tables() {
        let tables = fixture().list_tables().unwrap();
        let summary: Vec<_> = tables.iter().map(|t| (t.name.as_str(), t.record_count)).collect();
        assert_eq!(summary, vec![("orders", 0), ("shippers", 2)]);
    }

    #[test]
    fn test_sqlite_options() {
        let catalog = fixture();
        let fields = vec!["id".to_string(), "name".to_string(), "phone".to_string()];
        let options = catalog.fetch_foreign_key_options("shippers", &fields).unwrap();

        assert_eq!(
            options,
            vec![
                FieldOption::new("1 - Speedy Express - 555-0101", "1"),
                FieldOption::new("2 - United Package", "2"),
            ]
        );
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("Order Details"), "\"Order Details\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
