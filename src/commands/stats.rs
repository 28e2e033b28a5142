use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::catalog::Catalog;

pub fn execute(data_dir: Option<PathBuf>, json: bool) -> Result<()> {
   let store = super::open_store(data_dir.as_deref())?;
   let stats = Catalog::new(store).statistics();

   if json {
      println!("{}", serde_json::to_string_pretty(&stats)?);
      return Ok(());
   }

   println!("{}\n", style("Dataset statistics").bold());
   println!("{} {}", style("Ventures:").dim(), style(stats.total_emprendimientos).cyan());
   println!("{} {}", style("Products:").dim(), style(stats.total_productos).cyan());
   println!("{} {}", style("Services:").dim(), style(stats.total_servicios).cyan());
   println!("{} {}", style("Items:").dim(), style(stats.total_items).cyan());

   println!("\n{}", style("Product categories").bold());
   print_categories(&stats.categorias_productos);
   println!("\n{}", style("Service categories").bold());
   print_categories(&stats.categorias_servicios);

   Ok(())
}

fn print_categories(categories: &[String]) {
   if categories.is_empty() {
      println!("  {}", style("(none)").dim());
   }
   for categoria in categories {
      println!("  {} {categoria}", style("•").dim());
   }
}
