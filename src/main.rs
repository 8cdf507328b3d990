use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use table_form_builder::{
    cli::{Cli, Commands, FormsCommand},
    config::Settings,
    form::{field_type_for, FormConfig, FormSession},
    logging,
    nit::validate_nit,
    parser::read_columns_file,
    ui::{FormPreview, PreviewApp},
    writer::{generate_crud_procedure, generate_form_component, FormStore},
};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init();

    let settings = Settings::resolve(cli.database, cli.store)?;

    match cli.command {
        Commands::ListTables => {
            let catalog = settings.open_catalog()?;
            println!("Available tables:\n");
            for table in catalog.list_tables()? {
                println!(
                    "  {:<20} {:>8} records {:>6} KB  {}",
                    table.name, table.record_count, table.size_kb, table.description
                );
            }
        }

        Commands::Columns { table } => {
            let catalog = settings.open_catalog()?;
            let columns = catalog.fetch_columns(&table)?;
            if columns.is_empty() {
                println!("No columns found for {}", table);
                return Ok(());
            }

            println!("Structure of {}:\n", table);
            for col in &columns {
                let mut flags = Vec::new();
                if col.is_primary_key {
                    flags.push("PK".to_string());
                }
                if let Some(referenced) = &col.referenced_table {
                    flags.push(format!("FK -> {}", referenced));
                }
                if !col.nullable {
                    flags.push("NOT NULL".to_string());
                }

                println!(
                    "  {:<20} {:<16} {:<10} {}",
                    col.name,
                    col.data_type,
                    field_type_for(col),
                    flags.join(", ")
                );
            }
        }

        Commands::Derive {
            table,
            form,
            json,
            save,
        } => {
            let catalog = settings.open_catalog()?;
            let session = form.build_session(catalog.as_ref(), &table)?;
            let config = session.to_snapshot()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print_session(&session);
            }

            if save {
                let store = settings.open_store()?;
                store.save(&config)?;
                println!(
                    "\nSaved {} as {} in {:?}",
                    config.name(),
                    config.id(),
                    settings.store_path()
                );
            }
        }

        Commands::Generate {
            table,
            form,
            output,
        } => {
            let catalog = settings.open_catalog()?;
            let session = form.build_session(catalog.as_ref(), &table)?;
            let config = session.to_snapshot()?;
            write_output(&generate_form_component(&config), output.as_deref())?;
        }

        Commands::Procedure { table, columns } => {
            let columns = match columns {
                Some(path) => read_columns_file(&path)?,
                None => settings.open_catalog()?.fetch_columns(&table)?,
            };
            println!("{}", generate_crud_procedure(&table, &columns));
        }

        Commands::Nit {
            number,
            document_type,
        } => {
            let result = validate_nit(number.trim(), &document_type);
            match (result.is_valid, result.verification_digit) {
                (true, Some(digit)) => println!("{}-{}", number.trim(), digit),
                (true, None) => println!(
                    "Document type {} is not a NIT; no verification digit applies",
                    document_type
                ),
                (false, _) => anyhow::bail!("Invalid NIT: {}", number),
            }
        }

        Commands::Forms { action } => {
            let store = settings.open_store()?;
            match action {
                FormsCommand::List => {
                    let forms = store.load_all()?;
                    if forms.is_empty() {
                        println!("No saved forms in {:?}", settings.store_path());
                    }
                    for config in &forms {
                        println!(
                            "  {}  {:<24} {:<16} v{}  {} fields  {}",
                            config.id(),
                            config.name(),
                            config.table_name(),
                            config.version(),
                            config.fields().len(),
                            config.created_at().format("%Y-%m-%d %H:%M")
                        );
                    }
                }
                FormsCommand::Show { id } => {
                    let config = find_form(&store, &id)?;
                    println!("{}", serde_json::to_string_pretty(&config)?);
                }
                FormsCommand::Export { id, output } => {
                    let config = find_form(&store, &id)?;
                    write_output(&generate_form_component(&config), output.as_deref())?;
                }
            }
        }

        Commands::Preview { table, form, nit } => {
            let catalog = settings.open_catalog()?;
            let session = form.build_session(catalog.as_ref(), &table)?;
            let preview = FormPreview::from_session(&session, nit.as_deref());

            let app = PreviewApp::new()?;
            app.run(&preview)?;
        }
    }

    Ok(())
}

fn print_session(session: &FormSession) {
    println!("{} ({})", session.name(), session.table_name());
    if !session.description().is_empty() {
        println!("{}", session.description());
    }
    println!();

    for field in session.fields() {
        let mut flags = Vec::new();
        if field.required {
            flags.push("required".to_string());
        }
        if field.is_primary_key {
            flags.push("PK".to_string());
        }
        if let Some(table) = &field.referenced_table {
            let display = field.foreign_key_fields.clone().unwrap_or_default().join(", ");
            flags.push(format!("FK -> {} ({})", table, display));
        }

        println!(
            "  {:>2}. {:<24} {:<20} {:<9} {}",
            field.order,
            field.label,
            field.name,
            field.field_type,
            flags.join(", ")
        );
    }

    if let Some(dv) = session.verification_digit(None) {
        println!("\n  {} is computed from {}", dv.label, dv.source_field);
    }
}

fn find_form(store: &FormStore, id: &str) -> Result<FormConfig> {
    store
        .get(id)?
        .with_context(|| format!("No saved form with id {}", id))
}

fn write_output(source: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, source).with_context(|| format!("Failed to write {:?}", path))?;
            println!("Wrote {:?}", path);
        }
        None => println!("{}", source),
    }
    Ok(())
}
