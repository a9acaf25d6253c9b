//! Configuration utilities.

/// TOML configuration file (`tollgate.toml`) and its validation.
pub mod toml_config;
