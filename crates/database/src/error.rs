use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database query failed: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Integrity constraint violated: parent key (customer_id={0}) not found")]
    MissingParent(i32),

    #[error("The requested row was not found in the database.")]
    NotFound,
}
