use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::form::FormConfig;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS form_configs (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    table_name TEXT NOT NULL,
    description TEXT NOT NULL,
    version INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    fields_json TEXT NOT NULL
)";

const SELECT_COLUMNS: &str =
    "SELECT id, name, table_name, description, version, created_at, fields_json FROM form_configs";

/// Saved form configurations backed by SQLite
pub struct FormStore {
    conn: Connection,
}

impl FormStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open form store: {:?}", db_path))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to create in-memory store")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        conn.execute(CREATE_TABLE, [])
            .context("Failed to create form_configs table")?;
        Ok(Self { conn })
    }

    /// Insert or replace a form configuration
    pub fn save(&self, config: &FormConfig) -> Result<()> {
        let fields_json =
            serde_json::to_string(config.fields()).context("Failed to serialize fields")?;

        self.conn
            .execute(
                "INSERT OR REPLACE INTO form_configs
                 (id, name, table_name, description, version, created_at, fields_json)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    config.id(),
                    config.name(),
                    config.table_name(),
                    config.description(),
                    config.version(),
                    config.created_at().to_rfc3339(),
                    fields_json,
                ],
            )
            .with_context(|| format!("Failed to save form: {}", config.id()))?;

        info!(id = config.id(), table = config.table_name(), "saved form configuration");
        Ok(())
    }

    /// All saved forms, oldest first
    pub fn load_all(&self) -> Result<Vec<FormConfig>> {
        let sql = format!("{} ORDER BY created_at, id", SELECT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;

        let rows = stmt
            .query_map([], read_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let configs = rows
            .into_iter()
            .map(StoredForm::into_config)
            .collect::<Result<Vec<_>>>()?;

        debug!(count = configs.len(), "loaded form configurations");
        Ok(configs)
    }

    pub fn get(&self, id: &str) -> Result<Option<FormConfig>> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let row = self
            .conn
            .query_row(&sql, [id], read_row)
            .optional()
            .with_context(|| format!("Failed to load form: {}", id))?;

        row.map(StoredForm::into_config).transpose()
    }
}

/// Raw row as stored
struct StoredForm {
    id: String,
    name: String,
    table_name: String,
    description: String,
    version: u32,
    created_at: String,
    fields_json: String,
}

fn read_row(row: &Row) -> rusqlite::Result<StoredForm> {
    Ok(StoredForm {
        id: row.get(0)?,
        name: row.get(1)?,
        table_name: row.get(2)?,
        description: row.get(3)?,
        version: row.get(4)?,
        created_at: row.get(5)?,
        fields_json: row.get(6)?,
    })
}

impl StoredForm {
    /// Rebuild the snapshot through its serialized form
    fn into_config(self) -> Result<FormConfig> {
        let fields: serde_json::Value = serde_json::from_str(&self.fields_json)
            .with_context(|| format!("Corrupt field list for form {}", self.id))?;

        let value = serde_json::json!({
            "id": self.id,
            "name": self.name,
            "tableName": self.table_name,
            "description": self.description,
            "fields": fields,
            "version": self.version,
            "createdAt": self.created_at,
        });

        serde_json::from_value(value).with_context(|| format!("Invalid stored form {}", self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormSession;
    use crate::schema::tables::{CUSTOMERS, ORDERS};

    #[test]
    fn test_save_and_get() {
        let store = FormStore::open_in_memory().unwrap();
        let mut session = FormSession::for_table("Customers", &CUSTOMERS.column_metadata());
        session.reorder(11, Some(0));
        let config = session.to_snapshot().unwrap();

        store.save(&config).unwrap();
        let loaded = store.get(config.id()).unwrap().unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.fields()[0].name, "IsActive");
        assert!(store.get("form-missing").unwrap().is_none());
    }

    #[test]
    fn test_load_all() {
        let store = FormStore::open_in_memory().unwrap();
        assert!(store.load_all().unwrap().is_empty());

        let first = FormSession::for_table("Customers", &CUSTOMERS.column_metadata())
            .to_snapshot()
            .unwrap();
        let second = FormSession::for_table("Orders", &ORDERS.column_metadata())
            .to_snapshot()
            .unwrap();

        store.save(&first).unwrap();
        store.save(&second).unwrap();
        store.save(&first).unwrap();

        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|c| c.table_name() == "Orders"));
    }
}
