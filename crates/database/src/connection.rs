use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL database.
///
/// The pool is created from explicitly passed-in settings rather than a
/// process-global engine, and is shared across the whole application; each
/// request checks a connection out for the duration of its queries and
/// returns it on exit.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&settings.connection_url())
        .await?;

    Ok(pool)
}

/// Builds the pool without dialing the server; the first query connects.
pub fn connect_lazy(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(&settings.connection_url())?;

    Ok(pool)
}
