use std::path::{Path, PathBuf};

use anyhow::Result;
use console::style;

use crate::{
   config,
   loader::{self, Table},
   store::DatasetStore,
   types::ItemKind,
};

pub fn execute(data_dir: Option<PathBuf>, site_dir: Option<PathBuf>) -> Result<()> {
   println!("{}\n", style("edunari Doctor").bold());

   let cfg = config::get();
   let data_dir = data_dir.unwrap_or_else(|| cfg.data_dir.clone());
   let files = cfg.data_files(Some(&data_dir));

   check_path("Config", config::config_file_path());
   let mut all_good = check_path("Data directory", &data_dir);
   let site_ok = check_path("Site index", &site_index(site_dir, cfg));

   println!();

   let ventures =
      check_table("emprendimientos", &files.ventures, loader::load_ventures(&files.ventures));
   let products = check_table(
      "productos",
      &files.products,
      loader::load_items(&files.products, ItemKind::Product),
   );
   let services = check_table(
      "servicios",
      &files.services,
      loader::load_items(&files.services, ItemKind::Service),
   );

   all_good &= ventures.is_some() && products.is_some() && services.is_some();

   let store = DatasetStore::load(
      ventures.unwrap_or_default(),
      products.unwrap_or_default(),
      services.unwrap_or_default(),
   );
   let unjoinable = store.unjoinable_items().count();
   if unjoinable > 0 {
      println!(
         "\n{} {} item(s) reference a missing venture and will never be returned",
         style("○").yellow(),
         unjoinable
      );
   }
   if !site_ok {
      println!(
         "{} The API works without a site, but `/` will return 404",
         style("ℹ").cyan()
      );
   }

   let dirty = if env!("GIT_DIRTY") == "true" { "-dirty" } else { "" };
   println!(
      "\n{} {} {} | Rust: {} | Build: {}{}",
      style("System:").dim(),
      std::env::consts::OS,
      std::env::consts::ARCH,
      rustc_version_runtime::version(),
      env!("GIT_HASH"),
      dirty
   );

   if all_good {
      println!("\n{}", style("✓ All checks passed! Ready to serve.").green().bold());
   } else {
      println!(
         "\n{}",
         style("✗ Some data files are missing or unreadable. Check the data directory.")
            .red()
            .bold()
      );
   }

   Ok(())
}

/// The `index.html` that `serve` would use with the same flags.
fn site_index(site_dir: Option<PathBuf>, cfg: &config::Config) -> PathBuf {
   site_dir
      .unwrap_or_else(|| cfg.site_dir.clone())
      .join("index.html")
}

fn check_path(name: &str, path: &Path) -> bool {
   let exists = path.exists();
   let symbol = if exists {
      style("✓").green()
   } else {
      style("✗").red()
   };
   println!("{} {}: {}", symbol, name, style(path.display()).dim());
   exists
}

fn check_table<T>(name: &str, path: &Path, loaded: crate::Result<Table<T>>) -> Option<Vec<T>> {
   match loaded {
      Ok(table) => {
         let skipped = if table.skipped > 0 {
            format!(", {} skipped", table.skipped)
         } else {
            String::new()
         };
         println!(
            "{} Table: {} ({} rows{})",
            style("✓").green(),
            style(name).dim(),
            table.records.len(),
            skipped
         );
         Some(table.records)
      },
      Err(e) => {
         println!(
            "{} Table: {} ({})",
            style("✗").red(),
            style(name).dim(),
            style(format!("{}: {e}", path.display())).dim()
         );
         None
      },
   }
}
