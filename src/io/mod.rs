//! IO module - YAML configuration and result artifacts.

mod config;

pub use config::{parse_config, read_config, write_results};
