//! CLI subcommand implementations.

pub mod migrate;

pub use migrate::MigrationError;
