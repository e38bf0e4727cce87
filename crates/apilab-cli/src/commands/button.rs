//! Button management commands.
//!
//! Buttons are stored request definitions. They are never modified in
//! place: `edit` deletes the button together with its call history and
//! creates a replacement under a new id.
//!
//! # Examples
//!
//! ```bash
//! # Create a button
//! apilab button add --name "List users" --url https://jsonplaceholder.typicode.com/users
//!
//! # Create a POST button with a body
//! apilab button add -n "Create post" -m POST \
//!     -u https://jsonplaceholder.typicode.com/posts -b '{"title": "foo"}'
//!
//! # Delete a button without the prompt
//! apilab button remove btn_3f2a... --yes
//! ```

use super::{confirm, csv_field, truncate};
use crate::OutputFormat;
use crate::workspace;
use anyhow::Result;
use apilab_core::model::{Button, HttpMethod};
use apilab_core::validate::{ButtonDraft, ValidationErrors};
use console::style;
use std::path::PathBuf;

/// Field values given on the command line; `None` keeps the current value
#[derive(Debug, Default)]
pub struct ButtonFields {
    pub name: Option<String>,
    pub url: Option<String>,
    pub method: Option<HttpMethod>,
    pub headers: Option<String>,
    pub body: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

impl ButtonFields {
    pub fn apply_to(self, mut draft: ButtonDraft) -> ButtonDraft {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(url) = self.url {
            draft.url = url;
        }
        if let Some(method) = self.method {
            draft.method = method;
        }
        if let Some(headers) = self.headers {
            draft.headers = headers;
        }
        if let Some(body) = self.body {
            draft.body = body;
        }
        if let Some(color) = self.color {
            draft.color = color;
        }
        if let Some(icon) = self.icon {
            draft.icon = icon;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        draft
    }
}

pub fn add(data_dir: Option<PathBuf>, fields: ButtonFields, format: OutputFormat) -> Result<()> {
    let mut workspace = workspace::open(data_dir)?;
    let draft = fields.apply_to(ButtonDraft::default());

    let button = match workspace.create_button(&draft) {
        Ok(button) => button,
        Err(apilab_core::Error::Validation(errors)) => return Err(report_invalid(&errors)),
        Err(e) => return Err(e.into()),
    };

    print_created(&button, format)
}

pub fn list(data_dir: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let workspace = workspace::open(data_dir)?;
    let buttons = workspace.buttons();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(buttons)?),
        OutputFormat::Table => {
            println!("id,name,method,url,color,icon,created_at");
            for button in buttons {
                println!(
                    "{},{},{},{},{},{},{}",
                    button.id,
                    csv_field(&button.name),
                    button.method,
                    csv_field(&button.url),
                    button.color,
                    button.icon,
                    button.created_at.to_rfc3339()
                );
            }
        }
        OutputFormat::Pretty => {
            if buttons.is_empty() {
                println!("No buttons yet. Create one with 'apilab button add' or 'apilab template use'.");
                return Ok(());
            }

            println!("{}", style(format!("Buttons ({})", buttons.len())).bold());
            println!();
            for button in buttons {
                println!(
                    "  {:<6} {:<28} {}",
                    style(button.method.as_str()).yellow(),
                    truncate(&button.name, 28),
                    style(&button.id).dim()
                );
                println!("         {}", style(&button.url).dim());
            }
        }
    }
    Ok(())
}

pub fn show(data_dir: Option<PathBuf>, id: &str, format: OutputFormat) -> Result<()> {
    let workspace = workspace::open(data_dir)?;
    let button = workspace.button(id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(button)?),
        OutputFormat::Table => {
            println!("field,value");
            println!("id,{}", button.id);
            println!("name,{}", csv_field(&button.name));
            println!("method,{}", button.method);
            println!("url,{}", csv_field(&button.url));
            println!("color,{}", button.color);
            println!("icon,{}", button.icon);
            println!("created_at,{}", button.created_at.to_rfc3339());
        }
        OutputFormat::Pretty => print_button(button)?,
    }
    Ok(())
}

pub fn edit(
    data_dir: Option<PathBuf>,
    id: &str,
    changes: ButtonFields,
    format: OutputFormat,
) -> Result<()> {
    let mut workspace = workspace::open(data_dir)?;
    let draft = changes.apply_to(ButtonDraft::from(workspace.button(id)?));

    let button = match workspace.replace_button(id, &draft) {
        Ok(button) => button,
        Err(apilab_core::Error::Validation(errors)) => return Err(report_invalid(&errors)),
        Err(e) => return Err(e.into()),
    };

    if format == OutputFormat::Pretty {
        println!("{}", style("Previous call history for this button was removed.").dim());
    }
    print_created(&button, format)
}

pub fn remove(data_dir: Option<PathBuf>, id: &str, yes: bool) -> Result<()> {
    let mut workspace = workspace::open(data_dir)?;
    let button = workspace.button(id)?;
    let calls = workspace
        .calls()
        .iter()
        .filter(|call| call.button_id == id)
        .count();

    let prompt = format!(
        "This will permanently delete button '{}' and {} recorded call(s).",
        button.name, calls
    );
    if !confirm(&prompt, "delete", yes)? {
        return Ok(());
    }

    let removed = workspace.delete_button(id)?;
    println!("✅ Button '{}' deleted", removed.name);
    Ok(())
}

/// Print every validation message and turn them into an error
fn report_invalid(errors: &ValidationErrors) -> anyhow::Error {
    eprintln!("{}", style("Invalid button:").red().bold());
    for (field, message) in errors.iter() {
        eprintln!("  {} {}: {}", style("✗").red(), field, message);
    }
    anyhow::anyhow!("Button validation failed")
}

fn print_created(button: &Button, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(button)?),
        OutputFormat::Table => println!("{}", button.id),
        OutputFormat::Pretty => {
            println!("✅ Button '{}' created", button.name);
            println!("   id: {}", style(&button.id).cyan());
        }
    }
    Ok(())
}

fn print_button(button: &Button) -> Result<()> {
    println!("{}", style(&button.name).bold().cyan());
    if let Some(description) = &button.description {
        println!("  {}", style(description).dim());
    }
    println!();
    println!("  ID:       {}", button.id);
    println!("  Request:  {} {}", style(button.method.as_str()).yellow(), button.url);
    println!("            {}", style(button.method.description()).dim());
    println!("  Color:    {}", button.color);
    println!("  Icon:     {}", button.icon);
    println!("  Created:  {}", button.created_at.format("%Y-%m-%d %H:%M:%S UTC"));

    if !button.headers.is_empty() {
        println!("\n{}", style("Headers:").bold());
        for (name, value) in &button.headers {
            println!("  {}: {}", name, value);
        }
    }

    if let Some(body) = &button.body {
        if !button.method.accepts_body() {
            println!(
                "\n{}",
                style(format!("Body (not sent with {}):", button.method)).bold()
            );
        } else {
            println!("\n{}", style("Body:").bold());
        }
        println!("{}", body);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_override_only_given_values() {
        let base = ButtonDraft {
            name: "Users".to_string(),
            url: "https://api.test/users".to_string(),
            ..ButtonDraft::default()
        };
        let draft = ButtonFields {
            name: Some("People".to_string()),
            method: Some(HttpMethod::Post),
            ..ButtonFields::default()
        }
        .apply_to(base);

        assert_eq!(draft.name, "People");
        assert_eq!(draft.method, HttpMethod::Post);
        assert_eq!(draft.url, "https://api.test/users");
    }
}
