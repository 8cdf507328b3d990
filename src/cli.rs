use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::form::{FieldChanges, FieldType, FormSession};
use crate::parser::read_columns_file;
use crate::schema::Catalog;

#[derive(Parser, Debug)]
#[command(name = "table-form-builder")]
#[command(version, about = "Build dynamic forms from database table metadata")]
pub struct Cli {
    /// Read table metadata from this SQLite database instead of the demo catalog
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Saved forms database (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tables in the catalog
    ListTables,

    /// Show the columns of a table and the field each becomes
    Columns {
        table: String,
    },

    /// Derive and edit a form, then print or save it
    Derive {
        table: String,

        #[command(flatten)]
        form: FormArgs,

        /// Print the form configuration as JSON
        #[arg(long)]
        json: bool,

        /// Save the form to the store
        #[arg(long)]
        save: bool,
    },

    /// Generate React component source for a table form
    Generate {
        table: String,

        #[command(flatten)]
        form: FormArgs,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a CRUD stored procedure for a table
    Procedure {
        table: String,

        /// Load columns from a JSON/JSONL file instead of the catalog
        #[arg(long)]
        columns: Option<PathBuf>,
    },

    /// Compute the DIAN verification digit of a NIT
    Nit {
        number: String,

        /// DIAN document type code (31 = NIT)
        #[arg(short = 't', long, default_value = "31")]
        document_type: String,
    },

    /// Manage saved forms
    Forms {
        #[command(subcommand)]
        action: FormsCommand,
    },

    /// Preview a table form in the terminal
    Preview {
        table: String,

        #[command(flatten)]
        form: FormArgs,

        /// NIT value used for the verification digit row
        #[arg(long)]
        nit: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum FormsCommand {
    /// List saved forms
    List,

    /// Print a saved form as JSON
    Show { id: String },

    /// Generate React component source for a saved form
    Export {
        id: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Edits applied to a freshly derived form
#[derive(Args, Debug, Default, Clone)]
pub struct FormArgs {
    /// Load columns from a JSON/JSONL file instead of the catalog
    #[arg(long)]
    pub columns: Option<PathBuf>,

    /// Form name (default: "<table> Form")
    #[arg(long)]
    pub name: Option<String>,

    /// Form description
    #[arg(long)]
    pub description: Option<String>,

    /// Move a field, as FROM:TO positions (repeatable)
    #[arg(long = "move", value_name = "FROM:TO", value_parser = parse_move)]
    pub moves: Vec<(usize, usize)>,

    /// Override a field label, as FIELD=LABEL (repeatable)
    #[arg(long, value_name = "FIELD=LABEL", value_parser = parse_assignment)]
    pub label: Vec<(String, String)>,

    /// Override a field type, as FIELD=TYPE (repeatable)
    #[arg(long = "type", value_name = "FIELD=TYPE", value_parser = parse_type_override)]
    pub field_type: Vec<(String, FieldType)>,

    /// Foreign key display fields, as FIELD=a,b,c (repeatable)
    #[arg(long, value_name = "FIELD=COLUMNS", value_parser = parse_assignment)]
    pub display: Vec<(String, String)>,

    /// Mark fields as required (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub required: Vec<String>,

    /// Mark fields as optional (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub optional: Vec<String>,

    /// Keep the loading placeholder instead of fetching foreign key options
    #[arg(long)]
    pub no_options: bool,
}

impl FormArgs {
    /// Derive the form for `table` and apply the requested edits in order
    pub fn build_session(&self, catalog: &dyn Catalog, table: &str) -> Result<FormSession> {
        let columns = match &self.columns {
            Some(path) => read_columns_file(path)?,
            None => catalog
                .fetch_columns(table)
                .with_context(|| format!("Failed to read columns of {}", table))?,
        };

        if columns.is_empty() {
            bail!("Table {} has no columns (unknown table?)", table);
        }

        let mut session = FormSession::for_table(table, &columns);

        if let Some(name) = &self.name {
            session.set_name(name.clone());
        }
        if let Some(description) = &self.description {
            session.set_description(description.clone());
        }

        for (field, label) in &self.label {
            apply(&mut session, field, FieldChanges::label(label.clone()))?;
        }
        for (field, field_type) in &self.field_type {
            apply(&mut session, field, FieldChanges::field_type(*field_type))?;
        }
        for (field, columns) in &self.display {
            apply(&mut session, field, FieldChanges::display_fields(columns))?;
        }
        for field in &self.required {
            apply(&mut session, field, FieldChanges::required(true))?;
        }
        for field in &self.optional {
            apply(&mut session, field, FieldChanges::required(false))?;
        }

        for &(from, to) in &self.moves {
            if from >= session.fields().len() || to >= session.fields().len() {
                bail!(
                    "Cannot move {}:{}, the form has {} fields",
                    from,
                    to,
                    session.fields().len()
                );
            }
            session.reorder(from, Some(to));
        }

        if !self.no_options {
            session.populate_foreign_key_options(catalog);
        }

        Ok(session)
    }
}

fn apply(session: &mut FormSession, field_name: &str, changes: FieldChanges) -> Result<()> {
    let id = match session.field_by_name(field_name) {
        Some(field) => field.id.clone(),
        None => bail!("Unknown field: {}", field_name),
    };
    session.update_field(&id, changes)?;
    Ok(())
}

fn parse_move(s: &str) -> std::result::Result<(usize, usize), String> {
    let (from, to) = s
        .split_once(':')
        .ok_or_else(|| format!("Expected FROM:TO, got {}", s))?;
    let from = from
        .trim()
        .parse()
        .map_err(|_| format!("Invalid position: {}", from))?;
    let to = to
        .trim()
        .parse()
        .map_err(|_| format!("Invalid position: {}", to))?;
    Ok((from, to))
}

fn parse_assignment(s: &str) -> std::result::Result<(String, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected FIELD=VALUE, got {}", s))?;
    if field.trim().is_empty() {
        return Err(format!("Missing field name in {}", s));
    }
    Ok((field.trim().to_string(), value.to_string()))
}

fn parse_type_override(s: &str) -> std::result::Result<(String, FieldType), String> {
    let (field, value) = parse_assignment(s)?;
    Ok((field, value.parse()?))
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StaticCatalog;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_derive() {
        let cli = Cli::try_parse_from([
            "table-form-builder",
            "derive",
            "Orders",
            "--move",
            "14:0",
            "--type",
            "ShipAddress=textarea",
            "--optional",
            "Status,OrderDate",
            "--save",
        ])
        .unwrap();

        match cli.command {
            Commands::Derive { table, form, save, .. } => {
                assert_eq!(table, "Orders");
                assert!(save);
                assert_eq!(form.moves, vec![(14, 0)]);
                assert_eq!(
                    form.field_type,
                    vec![("ShipAddress".to_string(), FieldType::Textarea)]
                );
                assert_eq!(form.optional, vec!["Status", "OrderDate"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_move("3:1"), Ok((3, 1)));
        assert!(parse_move("3-1").is_err());
        assert_eq!(
            parse_assignment("Status=Estado"),
            Ok(("Status".to_string(), "Estado".to_string()))
        );
        assert!(parse_assignment("=x").is_err());
        assert!(parse_type_override("Status=checkbox").is_err());
    }

    #[test]
    fn test_build_session() {
        let args = FormArgs {
            name: Some("Order entry".into()),
            label: vec![("ShipName".into(), "Recipient".into())],
            display: vec![("CustomerID".into(), "name, country".into())],
            required: vec!["ShipCountry".into()],
            moves: vec![(14, 0)],
            ..Default::default()
        };

        let session = args.build_session(&StaticCatalog::new(), "Orders").unwrap();
        assert_eq!(session.name(), "Order entry");
        assert_eq!(session.fields()[0].name, "Status");
        assert_eq!(session.field_by_name("ShipName").unwrap().label, "Recipient");
        assert!(session.field_by_name("ShipCountry").unwrap().required);

        let customer = session.field_by_name("CustomerID").unwrap();
        let options = customer.options.as_ref().unwrap();
        assert_eq!(options[0].label, "Acme Inc. - USA");
    }

    #[test]
    fn test_build_session_errors() {
        let catalog = StaticCatalog::new();

        assert!(FormArgs::default().build_session(&catalog, "Nope").is_err());

        let locked = FormArgs {
            field_type: vec![("CustomerID".into(), FieldType::Number)],
            ..Default::default()
        };
        assert!(locked.build_session(&catalog, "Orders").is_err());

        let out_of_range = FormArgs {
            moves: vec![(0, 99)],
            ..Default::default()
        };
        assert!(out_of_range.build_session(&catalog, "Orders").is_err());
    }
}
