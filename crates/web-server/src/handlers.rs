use crate::{error::AppError, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use database::{Customer, DbError, LoyaltyLevel, NewCustomer, NewPurchase, Purchase};
use serde_json::json;
use std::sync::Arc;

/// # GET /
pub async fn read_root() -> Json<serde_json::Value> {
    Json(json!({ "Hello": "World" }))
}

// ----- Customer -----

/// # GET /customers
pub async fn get_customers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let customers = state.db_repo.get_all_customers().await?;
    Ok(Json(customers))
}

/// # GET /customer/:customer_id
/// Returns a zero-or-one element list; an empty result is a plain-text 404.
pub async fn get_customer(
    Path(customer_id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let customers = state.db_repo.get_customer(customer_id).await?;

    if customers.is_empty() {
        return Ok((StatusCode::NOT_FOUND, "Customer not found").into_response());
    }
    Ok(Json(customers).into_response())
}

/// # POST /customer/
/// The referenced loyalty level must exist before the insert is attempted.
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(customer): Json<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    if state.db_repo.get_loyalty_level_count(&customer.level_id).await? == 0 {
        return Err(AppError::InvalidReference(format!(
            "{} is not a valid loyalty level id.",
            customer.level_id
        )));
    }

    let created = state.db_repo.create_customer(&customer).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// # PUT /customer/
pub async fn update_customer(
    State(state): State<Arc<AppState>>,
    Json(customer): Json<Customer>,
) -> Result<Json<Customer>, AppError> {
    if state.db_repo.get_loyalty_level_count(&customer.level_id).await? == 0 {
        return Err(AppError::InvalidReference(format!(
            "{} is not a valid loyalty level.",
            customer.level_id
        )));
    }

    let previous = state
        .db_repo
        .update_customer(&customer)
        .await
        .map_err(|e| match e {
            DbError::NotFound => AppError::NotFound(format!(
                "Could not find a customer with key (customer_id={})",
                customer.customer_id
            )),
            other => other.into(),
        })?;
    Ok(Json(previous))
}

/// # DELETE /customer/:customer_id
/// Cascading: all purchases of the customer are deleted with it.
pub async fn delete_customer(
    Path(customer_id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Customer>, AppError> {
    let deleted = state
        .db_repo
        .delete_customer(customer_id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => AppError::NotFound(format!(
                "Could not find a customer with key (customer_id={customer_id})"
            )),
            other => other.into(),
        })?;
    Ok(Json(deleted))
}

// ----- Purchase -----

/// # GET /purchases
pub async fn get_purchases(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Purchase>>, AppError> {
    let purchases = state.db_repo.get_all_purchases().await?;
    Ok(Json(purchases))
}

/// # GET /purchase/:purchase_id
pub async fn get_purchase(
    Path(purchase_id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let purchases = state.db_repo.get_purchase(purchase_id).await?;

    if purchases.is_empty() {
        return Ok((StatusCode::NOT_FOUND, "No purchases found").into_response());
    }
    Ok(Json(purchases).into_response())
}

/// # GET /purchases/:customer_id
/// All purchases belonging to one customer.
pub async fn get_customer_purchases(
    Path(customer_id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let purchases = state.db_repo.get_purchases_for_customer(customer_id).await?;

    if purchases.is_empty() {
        return Ok((StatusCode::NOT_FOUND, "No purchases found").into_response());
    }
    Ok(Json(purchases).into_response())
}

/// # POST /purchases/
/// Relies on the storage layer's integrity check: a dangling customer_id
/// comes back as a typed missing-parent failure, reported as 404.
pub async fn create_purchase(
    State(state): State<Arc<AppState>>,
    Json(purchase): Json<NewPurchase>,
) -> Result<(StatusCode, Json<Purchase>), AppError> {
    let created = state
        .db_repo
        .create_purchase(&purchase)
        .await
        .map_err(|e| match e {
            DbError::MissingParent(customer_id) => AppError::InvalidReference(format!(
                "Integrity constraint violated: parent key (customer_id={customer_id}) not found"
            )),
            other => other.into(),
        })?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// # PUT /purchase/
pub async fn update_purchase(
    State(state): State<Arc<AppState>>,
    Json(purchase): Json<Purchase>,
) -> Result<Json<Purchase>, AppError> {
    let previous = state
        .db_repo
        .update_purchase(&purchase)
        .await
        .map_err(|e| match e {
            DbError::NotFound => AppError::NotFound(format!(
                "Could not find a purchase with key (purchase_id={}, customer_id={})",
                purchase.purchase_id, purchase.customer_id
            )),
            other => other.into(),
        })?;
    Ok(Json(previous))
}

/// # DELETE /purchase/:purchase_id
pub async fn delete_purchase(
    Path(purchase_id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Purchase>, AppError> {
    let deleted = state
        .db_repo
        .delete_purchase(purchase_id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => AppError::NotFound(format!(
                "Could not find a purchase with key (purchase_id={purchase_id})"
            )),
            other => other.into(),
        })?;
    Ok(Json(deleted))
}

// ----- LoyaltyLevel -----

/// # GET /loyalty_levels
pub async fn get_loyalty_levels(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LoyaltyLevel>>, AppError> {
    let levels = state.db_repo.get_all_loyalty_levels().await?;
    Ok(Json(levels))
}

/// # GET /loyalty_level/:level_id
pub async fn get_loyalty_level(
    Path(level_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let levels = state.db_repo.get_loyalty_level(&level_id).await?;

    if levels.is_empty() {
        return Ok((StatusCode::NOT_FOUND, "Loyalty level not found").into_response());
    }
    Ok(Json(levels).into_response())
}

/// # POST /loyalty_level/
/// The key is client-supplied, so there is nothing to pre-check.
pub async fn create_loyalty_level(
    State(state): State<Arc<AppState>>,
    Json(level): Json<LoyaltyLevel>,
) -> Result<(StatusCode, Json<LoyaltyLevel>), AppError> {
    let created = state.db_repo.create_loyalty_level(&level).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// # PUT /loyalty_level/
pub async fn update_loyalty_level(
    State(state): State<Arc<AppState>>,
    Json(level): Json<LoyaltyLevel>,
) -> Result<Json<LoyaltyLevel>, AppError> {
    let previous = state
        .db_repo
        .update_loyalty_level(&level)
        .await
        .map_err(|e| match e {
            DbError::NotFound => AppError::NotFound(format!(
                "Could not find a loyalty level with key (level_id={})",
                level.level_id
            )),
            other => other.into(),
        })?;
    Ok(Json(previous))
}

/// # DELETE /loyalty_level/:level_id
pub async fn delete_loyalty_level(
    Path(level_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<LoyaltyLevel>, AppError> {
    let deleted = state
        .db_repo
        .delete_loyalty_level(&level_id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => AppError::NotFound(format!(
                "Could not find a loyalty level with key (level_id={level_id})"
            )),
            other => other.into(),
        })?;
    Ok(Json(deleted))
}
