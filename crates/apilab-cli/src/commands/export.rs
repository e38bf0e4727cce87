use crate::workspace;
use anyhow::Result;
use apilab_core::analysis::TimeWindow;
use apilab_core::export::DirectorySink;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Write the calls of a window to `api-calls-<window>-<date>.json`
pub fn execute(data_dir: Option<PathBuf>, window: TimeWindow, output_dir: &Path) -> Result<()> {
    let workspace = workspace::open(data_dir)?;
    let now = Utc::now();
    let count = workspace.windowed_calls(window, now).len();

    let mut sink = DirectorySink::new(output_dir);
    let location = workspace.export(window, now, &mut sink)?;

    println!(
        "✅ Exported {} call(s) ({}) to {}",
        count,
        window.description().to_lowercase(),
        location
    );
    Ok(())
}
