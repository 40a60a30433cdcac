use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A loyalty tier granting a percentage discount.
///
/// The key is a short client-chosen code ("pl", "gl", ...), so the same
/// struct serves as both the stored row and the write payload.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LoyaltyLevel {
    pub level_id: String,
    pub description: Option<String>,
    #[serde(default)]
    pub discount: i32,
}

/// A customer row, keyed by a server-generated sequential id.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i32,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub level_id: String,
    pub signup_date: Option<NaiveDate>,
}

/// Payload for creating a customer. The database assigns `customer_id`,
/// so the input shape omits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub level_id: String,
    pub signup_date: Option<NaiveDate>,
}

/// A purchase row belonging to a customer.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Purchase {
    pub purchase_id: i32,
    pub customer_id: i32,
    pub purchase_name: Option<String>,
    pub purchase_date: Option<NaiveDate>,
}

/// Payload for creating a purchase; `purchase_id` is assigned by the
/// database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPurchase {
    pub customer_id: i32,
    pub purchase_name: Option<String>,
    pub purchase_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_customer_deserializes_without_a_key() {
        let input: NewCustomer = serde_json::from_str(
            r#"{"firstname":"Jane","lastname":"Doe","level_id":"gl"}"#,
        )
        .unwrap();
        assert_eq!(input.level_id, "gl");
        assert_eq!(input.firstname.as_deref(), Some("Jane"));
        assert!(input.date_of_birth.is_none());
        assert!(input.signup_date.is_none());
    }

    #[test]
    fn loyalty_level_discount_defaults_to_zero() {
        let level: LoyaltyLevel =
            serde_json::from_str(r#"{"level_id":"sl","description":"Silver"}"#).unwrap();
        assert_eq!(level.discount, 0);
    }

    #[test]
    fn new_purchase_requires_the_parent_key() {
        let missing_parent =
            serde_json::from_str::<NewPurchase>(r#"{"purchase_name":"socks"}"#);
        assert!(missing_parent.is_err());
    }
}
