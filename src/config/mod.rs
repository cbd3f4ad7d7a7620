//! Configuration loading and management for the Leave Converter.
//!
//! This module loads the converter configuration from a YAML file: the
//! workbook import layout and header aliases, storage locations, password
//! policy and server address.
//!
//! # Example
//!
//! ```no_run
//! use leave_converter::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./leave-converter.yaml").unwrap();
//! println!("Listening on {}", config.config().server.bind);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AuthConfig, BootstrapAdmin, ColumnAliases, ConverterConfig, ImportConfig, ServerConfig,
    StorageConfig,
};
