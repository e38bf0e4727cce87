use super::{csv_field, print_call_detail};
use crate::OutputFormat;
use crate::workspace;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// Execute buttons concurrently and print each resulting call
pub fn execute(data_dir: Option<PathBuf>, ids: &[String], format: OutputFormat) -> Result<()> {
    let mut workspace = workspace::open(data_dir)?;
    for id in ids {
        workspace.button(id)?;
    }

    let spinner = if format == OutputFormat::Pretty {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
        spinner.set_message(match ids.len() {
            1 => "Sending request...".to_string(),
            n => format!("Sending {} requests...", n),
        });
        spinner.enable_steady_tick(Duration::from_millis(80));
        Some(spinner)
    } else {
        None
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(workspace.execute_many(ids));

    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }
    let calls = result?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&calls)?),
        OutputFormat::Table => {
            println!("id,button_id,method,url,status,duration_ms,error");
            for call in &calls {
                println!(
                    "{},{},{},{},{},{},{}",
                    call.id,
                    call.button_id,
                    call.method,
                    csv_field(&call.url),
                    call.status,
                    call.duration,
                    csv_field(call.error.as_deref().unwrap_or(""))
                );
            }
        }
        OutputFormat::Pretty => {
            for (i, call) in calls.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print_call_detail(call)?;
            }
        }
    }
    Ok(())
}
