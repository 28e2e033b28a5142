//! CLI command implementations for edunari.
//!
//! Each module corresponds to a subcommand: `serve` runs the HTTP API and
//! static site, `search` and `stats` query the dataset from the terminal, and
//! `doctor` checks the installation.

pub mod doctor;
pub mod search;
pub mod serve;
pub mod stats;

use std::{path::Path, sync::Arc};

use anyhow::Result;

use crate::{config, loader, store::DatasetStore};

/// Loads the dataset from `data_dir`, or the configured directory.
fn open_store(data_dir: Option<&Path>) -> Result<Arc<DatasetStore>> {
   let cfg = config::get();
   let dir = data_dir.unwrap_or(cfg.data_dir.as_path());
   if !dir.is_dir() {
      anyhow::bail!("data directory not found: {}", dir.display());
   }
   Ok(Arc::new(loader::load_store(&cfg.data_files(Some(dir)))))
}
