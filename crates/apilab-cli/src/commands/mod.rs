pub mod button;
pub mod completion;
pub mod dashboard;
pub mod data;
pub mod export;
pub mod history;
pub mod run;
pub mod template;

use anyhow::Result;
use apilab_core::model::{Call, StatusClass, status_description};
use console::{StyledObject, style};
use std::io::{self, BufRead, Write};

/// Ask the user to type `expected` before a destructive action
///
/// Returns true when confirmed or when `yes` skips the prompt.
pub fn confirm(prompt: &str, expected: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }

    print!("⚠️  {}\nType '{}' to confirm: ", prompt, expected);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    if input.trim() != expected {
        println!("Cancelled.");
        return Ok(false);
    }
    Ok(true)
}

/// Status code colored by class; failed calls show as `ERR`
pub(crate) fn styled_status(call: &Call) -> StyledObject<String> {
    if call.is_error() {
        return style("ERR".to_string()).red().bold();
    }
    let text = call.status.to_string();
    match call.status_class() {
        StatusClass::Success => style(text).green(),
        StatusClass::Redirect => style(text).cyan(),
        StatusClass::ClientError => style(text).yellow(),
        StatusClass::ServerError => style(text).red(),
        StatusClass::Other => style(text).dim(),
    }
}

pub(crate) fn print_call_line(call: &Call) {
    println!(
        "  {:>3}  {:<6} {:<24} {:>6} ms  {}  {}",
        styled_status(call),
        call.method.as_str(),
        truncate(&call.button_name, 24),
        call.duration,
        style(call.timestamp.format("%Y-%m-%d %H:%M:%S")).dim(),
        style(&call.id).dim()
    );
}

/// Full view of one call including its response
pub(crate) fn print_call_detail(call: &Call) -> Result<()> {
    println!("{}", style(&call.button_name).bold().cyan());
    println!("  Call:      {}", call.id);
    println!("  Button:    {}", call.button_id);
    println!("  Request:   {} {}", style(call.method.as_str()).yellow(), call.url);
    println!("  Status:    {} {}", styled_status(call), call.status_text);
    println!("  Duration:  {} ms", call.duration);
    println!("  Time:      {}", call.timestamp.to_rfc3339());

    if let Some(error) = &call.error {
        println!("  Error:     {}", style(error).red());
    } else {
        println!("             {}", style(status_description(call.status)).dim());
    }

    if let Some(response) = &call.response {
        println!("\n{}", style("Response:").bold());
        println!("{}", serde_json::to_string_pretty(response)?);
    }
    Ok(())
}

pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Quote a value for CSV output when it needs it
pub(crate) fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
