use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::schema::{Catalog, SqliteCatalog, StaticCatalog};
use crate::writer::FormStore;

const STORE_FILE: &str = "forms.db";

/// Where table metadata comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// The demo tables compiled into the binary
    BuiltIn,
    /// A SQLite database file
    Sqlite(PathBuf),
}

/// Resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub catalog: CatalogSource,
    pub store_path: PathBuf,
}

impl Settings {
    /// Combine command line overrides with the platform defaults
    pub fn resolve(database: Option<PathBuf>, store: Option<PathBuf>) -> Result<Self> {
        let catalog = match database {
            Some(path) => CatalogSource::Sqlite(path),
            None => CatalogSource::BuiltIn,
        };

        let store_path = match store {
            Some(path) => path,
            None => default_store_path()?,
        };

        Ok(Self {
            catalog,
            store_path,
        })
    }

    pub fn open_catalog(&self) -> Result<Box<dyn Catalog>> {
        match &self.catalog {
            CatalogSource::BuiltIn => Ok(Box::new(StaticCatalog::new())),
            CatalogSource::Sqlite(path) => Ok(Box::new(SqliteCatalog::open(path)?)),
        }
    }

    pub fn open_store(&self) -> Result<FormStore> {
        FormStore::open(&self.store_path)
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }
}

/// `forms.db` in the platform data directory
pub fn default_store_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "table-form-builder")
        .context("Could not determine data directory")?;
    Ok(proj_dirs.data_dir().join(STORE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_paths() {
        let settings = Settings::resolve(
            Some(PathBuf::from("catalog.db")),
            Some(PathBuf::from("/tmp/forms.db")),
        )
        .unwrap();

        assert_eq!(
            settings.catalog,
            CatalogSource::Sqlite(PathBuf::from("catalog.db"))
        );
        assert_eq!(settings.store_path(), Path::new("/tmp/forms.db"));
    }

    #[test]
    fn test_builtin_catalog() {
        let settings = Settings::resolve(None, Some(PathBuf::from("forms.db"))).unwrap();
        assert_eq!(settings.catalog, CatalogSource::BuiltIn);

        let tables = settings.open_catalog().unwrap().list_tables().unwrap();
        assert!(tables.iter().any(|t| t.name == "Customers"));
    }

    #[test]
    fn test_missing_database_rejected() {
        let settings = Settings::resolve(
            Some(PathBuf::from("/definitely/not/here.db")),
            Some(PathBuf::from("forms.db")),
        )
        .unwrap();
        assert!(settings.open_catalog().is_err());
    }
}
