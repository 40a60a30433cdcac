use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::DatabaseSettings;

/// Loads the database settings from `DB_*` environment variables.
///
/// This function is the primary entry point for this crate. Every key has a
/// default, so a bare environment yields a working local-development
/// configuration instead of a startup failure.
pub fn load_database_settings() -> Result<DatabaseSettings, ConfigError> {
    let builder = config::Config::builder()
        .set_default("host", "localhost")?
        .set_default("port", 5432)?
        .set_default("username", "postgres")?
        .set_default("password", "postgres")?
        .set_default("database", "loyalty")?
        // DB_HOST -> host, DB_PORT -> port, and so on. Environment values
        // arrive as strings; try_parsing turns the port back into a number.
        .add_source(config::Environment::with_prefix("DB").try_parsing(true))
        .build()?;

    let settings = builder.try_deserialize::<DatabaseSettings>()?;

    Ok(settings)
}
