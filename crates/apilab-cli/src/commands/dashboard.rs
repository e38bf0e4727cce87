use super::print_call_line;
use crate::OutputFormat;
use crate::refresh::AutoRefresh;
use crate::workspace;
use anyhow::{Result, bail};
use apilab_core::analysis::{Health, Metrics, TimeWindow};
use chrono::Utc;
use console::{Term, style};
use std::path::PathBuf;
use std::time::Duration;

const BAR_WIDTH: usize = 30;

pub fn execute(
    data_dir: Option<PathBuf>,
    window: TimeWindow,
    watch: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let Some(seconds) = watch else {
        return render(data_dir.as_ref(), window, format);
    };
    if seconds == 0 {
        bail!("--watch interval must be at least 1 second");
    }

    tracing::info!("Refreshing every {}s, press Ctrl+C to stop", seconds);
    let refresh = AutoRefresh::new(Duration::from_secs(seconds));
    let term = Term::stdout();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(refresh.run(|| {
        if format == OutputFormat::Pretty && term.is_term() {
            term.clear_screen()?;
        }
        render(data_dir.as_ref(), window, format)?;
        if format == OutputFormat::Pretty {
            println!(
                "\n{}",
                style(format!(
                    "Refreshing every {}s. Press Ctrl+C to stop.",
                    seconds
                ))
                .dim()
            );
        }
        Ok(())
    }))
}

/// Re-read saved state and print the metrics for one window
fn render(data_dir: Option<&PathBuf>, window: TimeWindow, format: OutputFormat) -> Result<()> {
    let workspace = workspace::open(data_dir.cloned())?;
    let metrics = workspace.metrics(window, Utc::now());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&metrics)?),
        OutputFormat::Table => output_table(&metrics, window),
        OutputFormat::Pretty => output_pretty(&metrics, window),
    }
    Ok(())
}

fn output_pretty(metrics: &Metrics, window: TimeWindow) {
    println!(
        "\n{}",
        style(format!("API Dashboard - {}", window.description()))
            .bold()
            .cyan()
    );
    println!("{}", style("=".repeat(40)).cyan());

    if metrics.total == 0 {
        println!("\nNo calls in this window. Run a button with 'apilab run <id>'.");
        return;
    }

    println!("\n{}", style("Summary:").bold());
    println!("  Total Calls:     {}", metrics.total);
    println!("  Success Rate:    {}%", metrics.success_percent);
    println!("  Average Time:    {} ms", metrics.durations.average);
    println!("  Errors:          {}", metrics.error_count);
    println!("  Health:          {}", styled_health(metrics.health));

    let status = &metrics.status;
    println!("\n{}", style("Status Codes:").bold());
    for (label, count, color) in [
        ("2xx Success", status.success, console::Color::Green),
        ("4xx Client", status.client_error, console::Color::Yellow),
        ("5xx Server", status.server_error, console::Color::Red),
    ] {
        let percent = status.percent(count);
        println!(
            "  {:<12} {} {:>3}% ({})",
            label,
            style(bar(percent)).fg(color),
            percent,
            count
        );
    }

    let durations = &metrics.durations;
    println!("\n{}", style("Response Times:").bold());
    println!("  Average:  {} ms", durations.average);
    println!("  Median:   {} ms", durations.median);
    println!("  Fastest:  {} ms", durations.min);
    println!("  Slowest:  {} ms", durations.max);

    if !metrics.methods.is_empty() {
        println!("\n{}", style("Methods:").bold());
        for method in &metrics.methods {
            println!(
                "  {:<7} {}",
                style(method.method.as_str()).yellow(),
                method.count
            );
        }
    }

    if !metrics.recent.is_empty() {
        println!("\n{}", style("Recent Calls:").bold());
        for call in &metrics.recent {
            print_call_line(call);
        }
    }
    println!();
}

fn output_table(metrics: &Metrics, window: TimeWindow) {
    println!("Metric,Value");
    println!("Window,{}", window.label());
    println!("Total Calls,{}", metrics.total);
    println!("Success Rate (%),{}", metrics.success_percent);
    println!("Errors,{}", metrics.error_count);
    println!("2xx,{}", metrics.status.success);
    println!("4xx,{}", metrics.status.client_error);
    println!("5xx / Failed,{}", metrics.status.server_error);
    println!("Average Time (ms),{}", metrics.durations.average);
    println!("Median Time (ms),{}", metrics.durations.median);
    println!("Min Time (ms),{}", metrics.durations.min);
    println!("Max Time (ms),{}", metrics.durations.max);
    println!("Health,{}", metrics.health.as_str());
    for method in &metrics.methods {
        println!("{} Calls,{}", method.method, method.count);
    }
}

fn styled_health(health: Health) -> console::StyledObject<&'static str> {
    let text = health.as_str();
    match health {
        Health::Excellent => style(text).green().bold(),
        Health::Good => style(text).yellow().bold(),
        Health::NeedsAttention => style(text).red().bold(),
    }
}

/// Horizontal bar filled in proportion to a percentage
fn bar(percent: u32) -> String {
    let filled = (percent.min(100) as usize * BAR_WIDTH + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_fill() {
        assert_eq!(bar(0).chars().filter(|c| *c == '█').count(), 0);
        assert_eq!(bar(50).chars().filter(|c| *c == '█').count(), 15);
        assert_eq!(bar(100).chars().filter(|c| *c == '█').count(), BAR_WIDTH);
        assert_eq!(bar(100).chars().count(), BAR_WIDTH);
    }
}
