use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EdunariError {
   #[error("io error: {0}")]
   Io(#[from] std::io::Error),

   #[error("csv error: {0}")]
   Csv(#[from] csv::Error),

   #[error("dataset file not found: {}", .0.display())]
   MissingFile(PathBuf),

   #[error("column '{column}' not found in {}", .path.display())]
   MissingColumn { path: PathBuf, column: &'static str },

   #[error("invalid {field} value '{value}'")]
   InvalidField { field: &'static str, value: String },
}

pub type Result<T, E = EdunariError> = std::result::Result<T, E>;
