pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod loader;
pub mod search;
pub mod store;
pub mod types;

pub use error::{EdunariError, Result};
pub use types::*;
