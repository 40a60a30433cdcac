use crate::error::DbError;
use sqlx::PgPool;

const CREATE_LOYALTY_LEVEL: &str = r#"
CREATE TABLE loyalty_level (
    level_id    VARCHAR(2)   PRIMARY KEY,
    description VARCHAR(100),
    discount    INTEGER      NOT NULL DEFAULT 0
)
"#;

const CREATE_CUSTOMER: &str = r#"
CREATE TABLE customer (
    customer_id   SERIAL       PRIMARY KEY,
    firstname     VARCHAR(100),
    lastname      VARCHAR(100),
    date_of_birth DATE,
    level_id      VARCHAR(2)   NOT NULL REFERENCES loyalty_level (level_id),
    signup_date   DATE
)
"#;

const CREATE_PURCHASE: &str = r#"
CREATE TABLE purchase (
    purchase_id   SERIAL       PRIMARY KEY,
    customer_id   INTEGER      NOT NULL REFERENCES customer (customer_id) ON DELETE CASCADE,
    purchase_name VARCHAR(100),
    purchase_date DATE
)
"#;

/// Creates the three loyalty tables and their demo rows if they do not
/// exist yet.
///
/// The probe mirrors the original service: the presence of the `customer`
/// table decides whether the whole schema is considered bootstrapped.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DbError> {
    let customer_table: Option<String> =
        sqlx::query_scalar("SELECT to_regclass('customer')::text")
            .fetch_one(pool)
            .await?;

    if customer_table.is_some() {
        tracing::info!("Found the loyalty tables in the database");
        return Ok(());
    }

    tracing::info!("Creating the loyalty tables in the database");
    let mut tx = pool.begin().await?;
    sqlx::query(CREATE_LOYALTY_LEVEL).execute(&mut *tx).await?;
    sqlx::query(CREATE_CUSTOMER).execute(&mut *tx).await?;
    sqlx::query(CREATE_PURCHASE).execute(&mut *tx).await?;

    tracing::info!("Populating the loyalty tables with seed data");
    sqlx::query(
        "INSERT INTO loyalty_level (level_id, description, discount) \
         VALUES ('pl', 'Platinum', 25), ('gl', 'Gold', 15)",
    )
    .execute(&mut *tx)
    .await?;

    let customer_id: i32 = sqlx::query_scalar(
        "INSERT INTO customer (firstname, lastname, date_of_birth, level_id, signup_date) \
         VALUES ('John', 'Doe', CURRENT_DATE, 'pl', CURRENT_DATE) \
         RETURNING customer_id",
    )
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO purchase (customer_id, purchase_name, purchase_date) \
         VALUES ($1, 'something', CURRENT_DATE)",
    )
    .bind(customer_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Drops the three loyalty tables, children first.
///
/// This erases all data, including rows created during the session. It is
/// only invoked when the server runs in ephemeral demo mode.
pub async fn drop_schema(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Dropping the loyalty tables");
    sqlx::query("DROP TABLE IF EXISTS purchase").execute(pool).await?;
    sqlx::query("DROP TABLE IF EXISTS customer").execute(pool).await?;
    sqlx::query("DROP TABLE IF EXISTS loyalty_level").execute(pool).await?;
    Ok(())
}
