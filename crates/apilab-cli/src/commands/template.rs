use super::csv_field;
use crate::OutputFormat;
use crate::workspace;
use anyhow::Result;
use apilab_core::model::TemplateCategory;
use apilab_core::model::templates::{self, COLORS, ICONS};
use console::style;
use std::path::PathBuf;

pub fn list(format: OutputFormat) -> Result<()> {
    let templates = templates::builtin();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&templates)?),
        OutputFormat::Table => {
            println!("id,category,method,url,name");
            for template in &templates {
                println!(
                    "{},{},{},{},{}",
                    template.id,
                    template.category.as_str(),
                    template.method,
                    template.url,
                    csv_field(template.name)
                );
            }
        }
        OutputFormat::Pretty => {
            for category in [
                TemplateCategory::Basic,
                TemplateCategory::Advanced,
                TemplateCategory::Example,
            ] {
                let in_category: Vec<_> = templates
                    .iter()
                    .filter(|t| t.category == category)
                    .collect();
                if in_category.is_empty() {
                    continue;
                }

                println!("\n{}", style(category_title(category)).bold());
                for template in in_category {
                    println!(
                        "  {:<12} {:<6} {}",
                        style(template.id).cyan(),
                        style(template.method.as_str()).yellow(),
                        template.name
                    );
                    println!("  {:<12} {}", "", style(template.description).dim());
                }
            }

            let colors: Vec<String> = COLORS
                .iter()
                .map(|(name, hex)| format!("{} {}", name, hex))
                .collect();
            println!("\n{} {}", style("Colors:").bold(), colors.join(", "));
            println!("{} {}", style("Icons:").bold(), ICONS.join(", "));
            println!("\nCreate a button with 'apilab template use <id>'.");
        }
    }
    Ok(())
}

pub fn use_template(data_dir: Option<PathBuf>, id: &str, format: OutputFormat) -> Result<()> {
    let mut workspace = workspace::open(data_dir)?;
    let button = workspace.create_from_template(id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&button)?),
        OutputFormat::Table => println!("{}", button.id),
        OutputFormat::Pretty => {
            println!("✅ Button '{}' created from template '{}'", button.name, id);
            println!("   id: {}", style(&button.id).cyan());
        }
    }
    Ok(())
}

fn category_title(category: TemplateCategory) -> &'static str {
    match category {
        TemplateCategory::Basic => "Basic",
        TemplateCategory::Advanced => "Advanced",
        TemplateCategory::Example => "Examples",
    }
}
