use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::schema::ColumnMetadata;

/// Parse column metadata from a JSON array or from JSONL (one object per line)
pub fn parse_columns(text: &str) -> Result<Vec<ColumnMetadata>> {
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(text).context("Failed to parse column array");
    }

    let mut columns = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let column = parse_record(line).with_context(|| format!("Invalid column on line {}", idx + 1))?;
        columns.push(column);
    }

    Ok(columns)
}

/// Parse a single JSON column record
pub fn parse_record(line: &str) -> Result<ColumnMetadata> {
    let column: ColumnMetadata = serde_json::from_str(line).context("Failed to parse JSON")?;
    Ok(column)
}

/// Read a column metadata file
pub fn read_columns_file(path: &Path) -> Result<Vec<ColumnMetadata>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read: {:?}", path))?;
    parse_columns(&text).with_context(|| format!("Failed to load columns from {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array() {
        let text = r#"[
            {"name": "CategoryID", "dataType": "int", "nullable": false, "isPrimaryKey": true, "isForeignKey": false},
            {"name": "Description", "dataType": "text", "nullable": true}
        ]"#;
        let columns = parse_columns(text).unwrap();

        assert_eq!(columns.len(), 2);
        assert!(columns[0].is_primary_key);
        assert!(!columns[1].is_foreign_key);
    }

    #[test]
    fn test_parse_jsonl() {
        let text = "{\"name\":\"Id\",\"dataType\":\"int\",\"nullable\":false}\n\n{\"name\":\"SupplierID\",\"dataType\":\"int\",\"nullable\":true,\"isForeignKey\":true,\"referencedTable\":\"Suppliers\"}\n";
        let columns = parse_columns(text).unwrap();

        assert_eq!(columns.len(), 2);
        assert_eq!(columns[1].referenced_table.as_deref(), Some("Suppliers"));
    }

    #[test]
    fn test_parse_reports_line() {
        let text = "{\"name\":\"Id\",\"dataType\":\"int\",\"nullable\":false}\n{\"name\":\"Broken\"}\n";
        let err = parse_columns(text).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_columns("").unwrap().is_empty());
        assert!(parse_columns("[]").unwrap().is_empty());
    }
}
