use super::{confirm, csv_field, truncate};
use crate::OutputFormat;
use crate::workspace;
use anyhow::Result;
use apilab_core::classify::{DataField, DataItem, FieldType, display_value};
use console::style;
use std::path::PathBuf;

pub fn execute(data_dir: Option<PathBuf>, search: Option<&str>, format: OutputFormat) -> Result<()> {
    let workspace = workspace::open(data_dir)?;
    let term = search.unwrap_or("").trim();
    let items = workspace.data_items(term);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&items)?),
        OutputFormat::Table => {
            println!("item,call_id,key,type,label,value");
            for item in &items {
                for field in &item.fields {
                    println!(
                        "{},{},{},{},{},{}",
                        item.id,
                        item.source.call_id,
                        csv_field(&field.key),
                        field.field_type.as_str(),
                        csv_field(&field.label),
                        csv_field(&display_value(field))
                    );
                }
            }
        }
        OutputFormat::Pretty => print_items(&items, term, workspace.data_view().len()),
    }
    Ok(())
}

pub fn clear(data_dir: Option<PathBuf>, yes: bool) -> Result<()> {
    let mut workspace = workspace::open(data_dir)?;
    if workspace.data_view().is_empty() {
        println!("No data collected.");
        return Ok(());
    }

    let prompt = format!(
        "This will clear data from {} call(s). Call history is kept.",
        workspace.data_view().len()
    );
    if !confirm(&prompt, "clear", yes)? {
        return Ok(());
    }

    workspace.clear_data_view()?;
    println!("✅ Data cleared");
    Ok(())
}

fn print_items(items: &[DataItem], term: &str, calls: usize) {
    if calls == 0 {
        println!("No data collected yet. Successful calls from 'apilab run' show up here.");
        return;
    }

    let heading = if term.is_empty() {
        format!("Data ({} item(s) from {} call(s))", items.len(), calls)
    } else {
        format!("Data matching '{}' ({} item(s))", term, items.len())
    };
    println!("{}", style(heading).bold());

    if items.is_empty() {
        println!("\nNothing matches. Try a different search term.");
        return;
    }

    for item in items {
        println!(
            "\n{} {} {} {}",
            style(format!("[{}]", item.id)).dim(),
            style(&item.source.button_name).bold().cyan(),
            style(item.source.method.as_str()).yellow(),
            style(truncate(&item.source.url, 60)).dim()
        );
        for field in &item.fields {
            println!(
                "  {:<14} {}",
                style(&field.label).bold(),
                styled_value(field)
            );
        }
    }
}

fn styled_value(field: &DataField) -> String {
    let text = truncate(&display_value(field), 80);
    if field.value.is_null() {
        return style(text).dim().italic().to_string();
    }
    match field.field_type {
        FieldType::Email | FieldType::Url => style(text).underlined().to_string(),
        FieldType::Number => style(text).magenta().to_string(),
        FieldType::Boolean => style(text).yellow().to_string(),
        FieldType::Array | FieldType::Object => style(text).dim().to_string(),
        FieldType::String | FieldType::Date => text,
    }
}
