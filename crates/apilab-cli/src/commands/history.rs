use super::{confirm, csv_field, print_call_detail, print_call_line};
use crate::OutputFormat;
use crate::workspace;
use anyhow::{Result, anyhow};
use apilab_core::filter::CallFilter;
use apilab_core::model::HttpMethod;
use console::style;
use std::path::PathBuf;

/// Criteria for `history list`
#[derive(Debug, Default)]
pub struct ListOptions {
    pub status: Option<String>,
    pub method: Option<HttpMethod>,
    pub hosts: Vec<String>,
    pub button: Option<String>,
    pub limit: Option<usize>,
}

impl ListOptions {
    fn to_filter(&self) -> Result<CallFilter> {
        let hosts: Vec<String> = self
            .hosts
            .iter()
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .collect();

        let mut filter = CallFilter::new().with_hosts(&hosts)?;
        if let Some(status) = &self.status {
            filter = filter.with_status(status)?;
        }
        if let Some(method) = self.method {
            filter = filter.with_method(method);
        }
        if let Some(button) = &self.button {
            filter = filter.with_button(button.clone());
        }
        Ok(filter)
    }
}

pub fn list(data_dir: Option<PathBuf>, options: ListOptions, format: OutputFormat) -> Result<()> {
    let workspace = workspace::open(data_dir)?;
    let filter = options.to_filter()?;

    let mut calls = filter.apply(workspace.calls());
    tracing::debug!(
        "{} of {} call(s) match",
        calls.len(),
        workspace.calls().len()
    );
    if let Some(limit) = options.limit {
        calls.truncate(limit);
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&calls)?),
        OutputFormat::Table => {
            println!("id,timestamp,button,method,url,status,status_text,duration_ms,error");
            for call in &calls {
                println!(
                    "{},{},{},{},{},{},{},{},{}",
                    call.id,
                    call.timestamp.to_rfc3339(),
                    csv_field(&call.button_name),
                    call.method,
                    csv_field(&call.url),
                    call.status,
                    csv_field(&call.status_text),
                    call.duration,
                    csv_field(call.error.as_deref().unwrap_or(""))
                );
            }
        }
        OutputFormat::Pretty => {
            if calls.is_empty() {
                println!("No calls recorded.");
                return Ok(());
            }
            println!("{}", style(format!("Call history ({})", calls.len())).bold());
            println!();
            for call in calls {
                print_call_line(call);
            }
        }
    }
    Ok(())
}

pub fn show(data_dir: Option<PathBuf>, id: &str, format: OutputFormat) -> Result<()> {
    let workspace = workspace::open(data_dir)?;
    let call = workspace
        .records()
        .call(id)
        .ok_or_else(|| anyhow!("Call '{}' not found", id))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(call)?),
        OutputFormat::Table | OutputFormat::Pretty => print_call_detail(call)?,
    }
    Ok(())
}

pub fn clear(data_dir: Option<PathBuf>, yes: bool) -> Result<()> {
    let mut workspace = workspace::open(data_dir)?;
    let count = workspace.calls().len();
    if count == 0 && workspace.data_view().is_empty() {
        println!("No calls recorded.");
        return Ok(());
    }

    let prompt = format!("This will delete {} recorded call(s) and the collected data.", count);
    if !confirm(&prompt, "clear", yes)? {
        return Ok(());
    }

    workspace.clear_history()?;
    println!("✅ Call history cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_hosts_are_ignored() {
        let options = ListOptions {
            hosts: vec![" ".to_string(), "api.test".to_string()],
            ..ListOptions::default()
        };
        assert_eq!(options.to_filter().unwrap().hosts.len(), 1);
    }

    #[test]
    fn test_invalid_status_is_an_error() {
        let options = ListOptions {
            status: Some("abc".to_string()),
            ..ListOptions::default()
        };
        assert!(options.to_filter().is_err());
    }
}
