/// Database configuration and connection management
pub mod database;

/// Server and role configuration loading from config.toml
pub mod settings;
