//! Configuration for dataset locations, the HTTP listener and result limits.

use std::{
   fs,
   path::{Path, PathBuf},
   sync::OnceLock,
};

use directories::BaseDirs;
use figment::{
   Figment,
   providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Application configuration loaded from config file and environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
   pub data_dir:      PathBuf,
   pub site_dir:      PathBuf,
   pub ventures_file: String,
   pub products_file: String,
   pub services_file: String,

   pub host: String,
   pub port: u16,

   pub default_limit: usize,
   pub max_limit:     usize,
}

impl Default for Config {
   fn default() -> Self {
      Self {
         data_dir:      PathBuf::from("data"),
         site_dir:      PathBuf::from("."),
         ventures_file: "emprendimientos.csv".to_string(),
         products_file: "productos.csv".to_string(),
         services_file: "servicios.csv".to_string(),
         host:          "localhost".to_string(),
         port:          8000,
         default_limit: 50,
         max_limit:     100,
      }
   }
}

/// Paths of the three dataset tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
   pub ventures: PathBuf,
   pub products: PathBuf,
   pub services: PathBuf,
}

impl Config {
   pub fn load() -> Self {
      let config_path = config_file_path();
      if !config_path.exists() {
         Self::create_default_config(config_path);
      }

      Self::figment(config_path)
         .extract()
         .inspect_err(|e| tracing::warn!("failed to parse config: {e}"))
         .unwrap_or_default()
   }

   fn figment(path: &Path) -> Figment {
      Figment::from(Serialized::defaults(Self::default()))
         .merge(Toml::file(path))
         .merge(Env::prefixed("EDUNARI_"))
   }

   fn create_default_config(path: &Path) {
      if let Some(parent) = path.parent() {
         let _ = fs::create_dir_all(parent);
      }
      let default_config = Self::default();
      if let Ok(toml) = toml::to_string_pretty(&default_config) {
         let _ = fs::write(path, toml);
      }
   }

   /// Resolves the table files inside `data_dir`, or the configured directory
   /// when none is given.
   pub fn data_files(&self, data_dir: Option<&Path>) -> DataFiles {
      let dir = data_dir.unwrap_or(self.data_dir.as_path());
      DataFiles {
         ventures: dir.join(&self.ventures_file),
         products: dir.join(&self.products_file),
         services: dir.join(&self.services_file),
      }
   }
}

/// Returns the global configuration instance
pub fn get() -> &'static Config {
   CONFIG.get_or_init(Config::load)
}

/// Returns the base directory for edunari configuration
pub fn base_dir() -> &'static PathBuf {
   static ONCE: OnceLock<PathBuf> = OnceLock::new();
   ONCE.get_or_init(|| {
      BaseDirs::new()
         .map(|d| d.home_dir().join(".edunari"))
         .or_else(|| {
            std::env::var("HOME")
               .ok()
               .map(|h| PathBuf::from(h).join(".edunari"))
         })
         .unwrap_or_else(|| {
            std::env::current_dir()
               .unwrap_or_else(|_| PathBuf::from("."))
               .join(".edunari")
         })
   })
}

pub fn config_file_path() -> &'static PathBuf {
   static ONCE: OnceLock<PathBuf> = OnceLock::new();
   ONCE.get_or_init(|| base_dir().join("config.toml"))
}
