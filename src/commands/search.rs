use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::{
   search::SearchEngine,
   types::{ItemDetail, ScoredResult},
};

pub fn execute(
   query: String,
   data_dir: Option<PathBuf>,
   max: usize,
   json: bool,
   scores: bool,
) -> Result<()> {
   let store = super::open_store(data_dir.as_deref())?;
   let results = SearchEngine::new(store).search(&query, max);
   tracing::info!(query = %query, results = results.len(), "search");

   if json {
      println!("{}", serde_json::to_string_pretty(&results)?);
      return Ok(());
   }

   if results.is_empty() {
      println!("{}", style(format!("No results found for '{query}'")).yellow());
      return Ok(());
   }

   for (rank, result) in results.iter().enumerate() {
      print_result(rank + 1, result, scores);
   }
   println!("\n{}", style(format!("{} result(s)", results.len())).dim());

   Ok(())
}

fn print_result(rank: usize, result: &ScoredResult, scores: bool) {
   let availability = if result.disponible {
      style("disponible").green()
   } else {
      style("no disponible").red()
   };
   let detail = match &result.detail {
      ItemDetail::Product { stock } => format!("stock {stock}"),
      ItemDetail::Service { duracion } if duracion.is_empty() => String::new(),
      ItemDetail::Service { duracion } => duracion.clone(),
   };

   print!(
      "{}. {} {} {}",
      style(rank).dim(),
      style(&result.nombre).bold(),
      style(format!("[{}]", result.tipo)).cyan(),
      style(format!("${}", result.precio)).green()
   );
   if scores {
      print!(" {}", style(format!("(score {:.1})", result.score())).dim());
   }
   println!();

   println!(
      "   {} · {} · {}",
      result.emprendimiento,
      style(&result.categoria).dim(),
      style(&result.instagram).dim()
   );
   if !result.descripcion.is_empty() {
      println!("   {}", result.descripcion);
   }
   if detail.is_empty() {
      println!("   {availability}");
   } else {
      println!("   {availability} · {}", style(detail).dim());
   }
   if !result.tags.is_empty() {
      println!("   {}", style(format!("tags: {}", result.tags.join(", "))).dim());
   }
}
