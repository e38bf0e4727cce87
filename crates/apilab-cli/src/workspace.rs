//! Locating and opening the on-disk workspace.

use anyhow::{Result, anyhow};
use apilab_client::HttpInvoker;
use apilab_core::Coordinator;
use apilab_core::persist::FileStore;
use std::path::PathBuf;

pub type Workspace = Coordinator<FileStore, HttpInvoker>;

const DEFAULT_DIR_NAME: &str = ".apilab";

/// The data directory: an explicit path, or `~/.apilab`
pub fn data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(DEFAULT_DIR_NAME))
}

/// Open the workspace stored in the data directory
pub fn open(explicit: Option<PathBuf>) -> Result<Workspace> {
    let dir = data_dir(explicit)?;
    tracing::debug!("Using data directory: {}", dir.display());

    let invoker = HttpInvoker::new()?;
    Ok(Coordinator::open(FileStore::new(dir), invoker)?)
}
