//! CockroachDB Migration CLI Library
//!
//! Applies or rolls back versioned SQL schema migrations embedded in the
//! binary, delegating version bookkeeping and execution to the sqlx migrator.
//!
//! ## Modules
//!
//! - [`config`] - Configuration loading (defaults, file, environment, flags)
//! - [`migrations`] - Embedded migration set and runner entry points
//! - [`migrate`] - End-to-end invocation (connect, dialect, lock, run)

pub mod config;
pub mod migrate;
pub mod migrations;

// Re-export commonly used types
pub use config::{Config, ConfigError, DatabaseArgs, DatabaseConfig, Dialect};
pub use migrate::{Action, MigrateError};
