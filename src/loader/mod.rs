//! CSV loading for the venture, product and service tables.
//!
//! A table that cannot be read degrades to an empty table; a row that cannot
//! be converted is skipped. Both are logged and neither stops the others from
//! loading.

use std::{io::ErrorKind, path::Path};

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
   config::DataFiles,
   error::{EdunariError, Result},
   store::DatasetStore,
   types::{Item, ItemDetail, ItemKind, Venture, split_tags},
};

const VENTURE_COLUMNS: &[&str] = &["id", "nombre"];
const ITEM_COLUMNS: &[&str] = &["id", "nombre", "emprendimiento_id"];

/// Rows read from one CSV file.
#[derive(Debug)]
pub struct Table<T> {
   pub records: Vec<T>,
   pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct VentureRow {
   id:                    Option<String>,
   nombre:                Option<String>,
   categoria:             Option<String>,
   tipo:                  Option<String>,
   emprendedor_nombre:    Option<String>,
   emprendedor_instagram: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ItemRow {
   id:                Option<String>,
   nombre:            Option<String>,
   descripcion:       Option<String>,
   precio:            Option<String>,
   disponible:        Option<String>,
   tags:              Option<String>,
   emprendimiento_id: Option<String>,
   stock:             Option<String>,
   duracion:          Option<String>,
}

/// Loads all three tables and builds the store.
pub fn load_store(files: &DataFiles) -> DatasetStore {
   let ventures = or_empty("emprendimientos", &files.ventures, load_ventures(&files.ventures));
   let products =
      or_empty("productos", &files.products, load_items(&files.products, ItemKind::Product));
   let services =
      or_empty("servicios", &files.services, load_items(&files.services, ItemKind::Service));

   DatasetStore::load(ventures, products, services)
}

fn or_empty<T>(table: &str, path: &Path, result: Result<Table<T>>) -> Vec<T> {
   match result {
      Ok(loaded) => {
         tracing::info!(table, rows = loaded.records.len(), skipped = loaded.skipped, "table loaded");
         loaded.records
      },
      Err(e) => {
         tracing::warn!(table, path = %path.display(), "failed to load table, continuing empty: {e}");
         Vec::new()
      },
   }
}

pub fn load_ventures(path: &Path) -> Result<Table<Venture>> {
   read_table(path, VENTURE_COLUMNS, |row: VentureRow| {
      Ok(Venture {
         id:                    parse_id("id", row.id.as_deref())?,
         nombre:                text(row.nombre),
         categoria:             text(row.categoria),
         tipo:                  text(row.tipo),
         emprendedor_nombre:    text(row.emprendedor_nombre),
         emprendedor_instagram: text(row.emprendedor_instagram),
      })
   })
}

pub fn load_items(path: &Path, kind: ItemKind) -> Result<Table<Item>> {
   read_table(path, ITEM_COLUMNS, |row: ItemRow| {
      let detail = match kind {
         ItemKind::Product => {
            ItemDetail::Product { stock: parse_amount("stock", row.stock.as_deref())? }
         },
         ItemKind::Service => ItemDetail::Service { duracion: text(row.duracion) },
      };
      let tags = text(row.tags);

      Ok(Item {
         id: parse_id("id", row.id.as_deref())?,
         nombre: text(row.nombre),
         descripcion: text(row.descripcion),
         precio: parse_amount("precio", row.precio.as_deref())?,
         disponible: parse_bool("disponible", row.disponible.as_deref())?,
         tags_list: split_tags(&tags),
         tags,
         emprendimiento_id: parse_id("emprendimiento_id", row.emprendimiento_id.as_deref())?,
         detail,
      })
   })
}

fn read_table<R, T>(
   path: &Path,
   required: &[&'static str],
   convert: impl Fn(R) -> Result<T>,
) -> Result<Table<T>>
where
   R: DeserializeOwned,
{
   match std::fs::metadata(path) {
      Ok(_) => {},
      Err(e) if e.kind() == ErrorKind::NotFound => {
         return Err(EdunariError::MissingFile(path.to_path_buf()));
      },
      Err(e) => return Err(e.into()),
   }

   let mut rdr = ReaderBuilder::new()
      .has_headers(true)
      .trim(Trim::All)
      .flexible(true)
      .from_path(path)?;

   let headers = rdr.headers()?.clone();
   if let Some(column) = required
      .iter()
      .copied()
      .find(|column| !headers.iter().any(|h| h == *column))
   {
      return Err(EdunariError::MissingColumn { path: path.to_path_buf(), column });
   }

   let mut records = Vec::new();
   let mut skipped = 0;
   for result in rdr.records() {
      let record = match result {
         Ok(record) => record,
         Err(e) => {
            tracing::warn!(path = %path.display(), "skipping unreadable row: {e}");
            skipped += 1;
            continue;
         },
      };

      if record.iter().all(str::is_empty) {
         continue;
      }

      let line = record.position().map_or(0, |p| p.line());
      let converted = record
         .deserialize::<R>(Some(&headers))
         .map_err(EdunariError::from)
         .and_then(&convert);

      match converted {
         Ok(value) => records.push(value),
         Err(e) => {
            tracing::warn!(path = %path.display(), line, "skipping invalid row: {e}");
            skipped += 1;
         },
      }
   }

   Ok(Table { records, skipped })
}

fn text(raw: Option<String>) -> String {
   raw.unwrap_or_default()
}

fn invalid(field: &'static str, raw: &str) -> EdunariError {
   EdunariError::InvalidField { field, value: raw.to_string() }
}

/// Integer identifiers. Spreadsheet exports sometimes write `7.0`, which is
/// accepted; anything with a fractional part is not.
fn parse_id(field: &'static str, raw: Option<&str>) -> Result<i64> {
   let raw = raw.unwrap_or_default();
   if let Ok(id) = raw.parse::<i64>() {
      return Ok(id);
   }
   match raw.parse::<f64>() {
      Ok(value) if value.is_finite() && value.fract() == 0.0 => Ok(value as i64),
      _ => Err(invalid(field, raw)),
   }
}

/// Non-negative amounts (`precio`, `stock`). Blank means zero; fractional
/// values are truncated toward zero.
fn parse_amount(field: &'static str, raw: Option<&str>) -> Result<u64> {
   let Some(raw) = raw.filter(|s| !s.is_empty()) else {
      return Ok(0);
   };
   if let Ok(amount) = raw.parse::<u64>() {
      return Ok(amount);
   }
   match raw.parse::<f64>() {
      Ok(value) if value.is_finite() && value >= 0.0 => Ok(value.trunc() as u64),
      _ => Err(invalid(field, raw)),
   }
}

fn parse_bool(field: &'static str, raw: Option<&str>) -> Result<bool> {
   let raw = raw.unwrap_or_default();
   match raw.to_lowercase().as_str() {
      "" | "false" | "0" | "no" | "n" => Ok(false),
      "true" | "1" | "si" | "sí" | "yes" | "y" => Ok(true),
      _ => Err(invalid(field, raw)),
   }
}
