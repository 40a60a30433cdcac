//! # Loyalty Database Crate
//!
//! This crate is the application's adapter to PostgreSQL: it owns the
//! connection pool construction, the schema bootstrap/teardown, and every
//! SQL query issued by the service.
//!
//! ## Architectural Principles
//!
//! - **Adapter layer:** all database-specific logic lives here, behind a
//!   clean API; the web layer never sees SQL.
//! - **Plain rows:** entities are data-transfer structs mapped with
//!   `FromRow`; relationships are explicit filter queries, not live object
//!   graphs.
//! - **Typed failures:** every operation returns `Result<_, DbError>`;
//!   not-found and missing-parent outcomes are variants, never sentinel
//!   values.
//!
//! ## Public API
//!
//! - `connect`: builds the shared `PgPool` from typed settings.
//! - `ensure_schema` / `drop_schema`: startup and demo-teardown DDL.
//! - `DbRepository`: the data access methods for the three entities.
//! - `DbError`: the failure taxonomy of this crate.

// Declare the modules that constitute this crate.
pub mod bootstrap;
pub mod connection;
pub mod error;
pub mod models;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use bootstrap::{drop_schema, ensure_schema};
pub use connection::{connect, connect_lazy};
pub use error::DbError;
pub use models::{Customer, LoyaltyLevel, NewCustomer, NewPurchase, Purchase};
pub use repository::DbRepository;
