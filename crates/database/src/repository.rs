use crate::error::DbError;
use crate::models::{Customer, LoyaltyLevel, NewCustomer, NewPurchase, Purchase};
use sqlx::postgres::PgPool;

const CUSTOMER_COLUMNS: &str =
    "customer_id, firstname, lastname, date_of_birth, level_id, signup_date";
const PURCHASE_COLUMNS: &str = "purchase_id, customer_id, purchase_name, purchase_date";
const LOYALTY_LEVEL_COLUMNS: &str = "level_id, description, discount";

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ----- Customer -----

    /// Fetches all customers, unordered.
    pub async fn get_all_customers(&self) -> Result<Vec<Customer>, DbError> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    /// Fetches the customer with the given id, as a zero-or-one element list.
    pub async fn get_customer(&self, customer_id: i32) -> Result<Vec<Customer>, DbError> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE customer_id = $1"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    /// Inserts a new customer and returns the persisted row, including the
    /// sequence-assigned `customer_id`.
    pub async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer, DbError> {
        let created = sqlx::query_as::<_, Customer>(&format!(
            "INSERT INTO customer (firstname, lastname, date_of_birth, level_id, signup_date) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(&customer.firstname)
        .bind(&customer.lastname)
        .bind(customer.date_of_birth)
        .bind(&customer.level_id)
        .bind(customer.signup_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Overwrites every field of the customer row keyed by
    /// `customer.customer_id` and returns the pre-update snapshot.
    pub async fn update_customer(&self, customer: &Customer) -> Result<Customer, DbError> {
        let existing = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE customer_id = $1"
        ))
        .bind(customer.customer_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)?;

        sqlx::query(
            "UPDATE customer \
             SET firstname = $1, lastname = $2, date_of_birth = $3, level_id = $4, signup_date = $5 \
             WHERE customer_id = $6",
        )
        .bind(&customer.firstname)
        .bind(&customer.lastname)
        .bind(customer.date_of_birth)
        .bind(&customer.level_id)
        .bind(customer.signup_date)
        .bind(existing.customer_id)
        .execute(&self.pool)
        .await?;

        Ok(existing)
    }

    /// Deletes the customer with the given id and returns the deleted row.
    ///
    /// Dependent purchases go with it through the schema's ON DELETE CASCADE;
    /// nothing is emulated here.
    pub async fn delete_customer(&self, customer_id: i32) -> Result<Customer, DbError> {
        let existing = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE customer_id = $1"
        ))
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)?;

        sqlx::query("DELETE FROM customer WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&self.pool)
            .await?;

        Ok(existing)
    }

    // ----- LoyaltyLevel -----

    /// Fetches all loyalty levels, unordered.
    pub async fn get_all_loyalty_levels(&self) -> Result<Vec<LoyaltyLevel>, DbError> {
        let levels = sqlx::query_as::<_, LoyaltyLevel>(&format!(
            "SELECT {LOYALTY_LEVEL_COLUMNS} FROM loyalty_level"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(levels)
    }

    /// Fetches the loyalty level with the given code, as a zero-or-one
    /// element list.
    pub async fn get_loyalty_level(&self, level_id: &str) -> Result<Vec<LoyaltyLevel>, DbError> {
        let levels = sqlx::query_as::<_, LoyaltyLevel>(&format!(
            "SELECT {LOYALTY_LEVEL_COLUMNS} FROM loyalty_level WHERE level_id = $1"
        ))
        .bind(level_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(levels)
    }

    /// Counts loyalty levels with the given code. Used by the API layer as
    /// an existence pre-check before customer writes.
    pub async fn get_loyalty_level_count(&self, level_id: &str) -> Result<i64, DbError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loyalty_level WHERE level_id = $1")
                .bind(level_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Inserts a new loyalty level. The key is client-supplied.
    pub async fn create_loyalty_level(
        &self,
        level: &LoyaltyLevel,
    ) -> Result<LoyaltyLevel, DbError> {
        let created = sqlx::query_as::<_, LoyaltyLevel>(&format!(
            "INSERT INTO loyalty_level (level_id, description, discount) \
             VALUES ($1, $2, $3) \
             RETURNING {LOYALTY_LEVEL_COLUMNS}"
        ))
        .bind(&level.level_id)
        .bind(&level.description)
        .bind(level.discount)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Overwrites the loyalty level keyed by `level.level_id` and returns
    /// the pre-update snapshot.
    pub async fn update_loyalty_level(
        &self,
        level: &LoyaltyLevel,
    ) -> Result<LoyaltyLevel, DbError> {
        let existing = sqlx::query_as::<_, LoyaltyLevel>(&format!(
            "SELECT {LOYALTY_LEVEL_COLUMNS} FROM loyalty_level WHERE level_id = $1"
        ))
        .bind(&level.level_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)?;

        sqlx::query("UPDATE loyalty_level SET description = $1, discount = $2 WHERE level_id = $3")
            .bind(&level.description)
            .bind(level.discount)
            .bind(&existing.level_id)
            .execute(&self.pool)
            .await?;

        Ok(existing)
    }

    /// Deletes the loyalty level with the given code and returns the
    /// deleted row. No check is made for customers still referencing it;
    /// the database constraint has the last word.
    pub async fn delete_loyalty_level(&self, level_id: &str) -> Result<LoyaltyLevel, DbError> {
        let existing = sqlx::query_as::<_, LoyaltyLevel>(&format!(
            "SELECT {LOYALTY_LEVEL_COLUMNS} FROM loyalty_level WHERE level_id = $1"
        ))
        .bind(level_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)?;

        sqlx::query("DELETE FROM loyalty_level WHERE level_id = $1")
            .bind(level_id)
            .execute(&self.pool)
            .await?;

        Ok(existing)
    }

    // ----- Purchase -----

    /// Fetches all purchases, unordered.
    pub async fn get_all_purchases(&self) -> Result<Vec<Purchase>, DbError> {
        let purchases = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchase"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(purchases)
    }

    /// Fetches the purchase with the given id, as a zero-or-one element list.
    pub async fn get_purchase(&self, purchase_id: i32) -> Result<Vec<Purchase>, DbError> {
        let purchases = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchase WHERE purchase_id = $1"
        ))
        .bind(purchase_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(purchases)
    }

    /// Fetches all purchases belonging to one customer.
    pub async fn get_purchases_for_customer(
        &self,
        customer_id: i32,
    ) -> Result<Vec<Purchase>, DbError> {
        let purchases = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchase WHERE customer_id = $1"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(purchases)
    }

    /// Inserts a new purchase inside a transaction.
    ///
    /// A dangling `customer_id` trips the foreign-key constraint
    /// (SQLSTATE 23503); the transaction is rolled back and the failure is
    /// reported as `MissingParent` naming the offending id, so no row is
    /// ever left behind.
    pub async fn create_purchase(&self, purchase: &NewPurchase) -> Result<Purchase, DbError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, Purchase>(&format!(
            "INSERT INTO purchase (customer_id, purchase_name, purchase_date) \
             VALUES ($1, $2, $3) \
             RETURNING {PURCHASE_COLUMNS}"
        ))
        .bind(purchase.customer_id)
        .bind(&purchase.purchase_name)
        .bind(purchase.purchase_date)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(created) => {
                tx.commit().await?;
                Ok(created)
            }
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some("23503") =>
            {
                tx.rollback().await?;
                Err(DbError::MissingParent(purchase.customer_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrites the purchase matched on both `purchase_id` and
    /// `customer_id`, returning the pre-update snapshot.
    ///
    /// The composite lookup means a purchase cannot be reassigned to a
    /// different customer through this operation; a mismatched pair reports
    /// not-found.
    pub async fn update_purchase(&self, purchase: &Purchase) -> Result<Purchase, DbError> {
        let existing = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchase \
             WHERE purchase_id = $1 AND customer_id = $2"
        ))
        .bind(purchase.purchase_id)
        .bind(purchase.customer_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)?;

        sqlx::query(
            "UPDATE purchase SET customer_id = $1, purchase_name = $2, purchase_date = $3 \
             WHERE purchase_id = $4",
        )
        .bind(purchase.customer_id)
        .bind(&purchase.purchase_name)
        .bind(purchase.purchase_date)
        .bind(existing.purchase_id)
        .execute(&self.pool)
        .await?;

        Ok(existing)
    }

    /// Deletes the purchase with the given id and returns the deleted row.
    pub async fn delete_purchase(&self, purchase_id: i32) -> Result<Purchase, DbError> {
        let existing = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchase WHERE purchase_id = $1"
        ))
        .bind(purchase_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)?;

        sqlx::query("DELETE FROM purchase WHERE purchase_id = $1")
            .bind(purchase_id)
            .execute(&self.pool)
            .await?;

        Ok(existing)
    }
}
