//! Order Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;
use crate::domain::value_objects::Money;

pub const DEFAULT_STATUS: &str = "placed";

/// Snapshot of a cart line taken at checkout. Never a live product reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub title: String,
    pub price: Money,
    pub qty: u32,
    #[serde(default)]
    pub image: String,
}

/// A persisted order. Append-only: nothing in this crate updates or deletes one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub email: String,
    pub items: Vec<OrderLine>,
    /// Minor units, as computed by the client.
    pub total: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Raw checkout body. Fields stay loose so the checks below run in a fixed order.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct OrderSubmission {
    #[serde(default)] pub email: Option<String>,
    #[serde(default)] pub items: Option<Value>,
    #[serde(default)] pub total: Option<Value>,
}

/// A checkout that passed validation and is ready to persist.
#[derive(Clone, Debug, PartialEq)]
pub struct NewOrder {
    pub email: String,
    pub items: Vec<OrderLine>,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidOrder {
    #[error("email is required")]
    MissingEmail,
    #[error("items must be a non-empty array")]
    MissingItems,
    #[error("items are malformed: {0}")]
    MalformedItems(String),
    #[error("total is required")]
    MissingTotal,
    #[error("total must be an integer amount in cents")]
    MalformedTotal,
}

impl OrderSubmission {
    /// Checks email, then items, then total; the first failure wins.
    ///
    /// The total is trusted as submitted and is not recomputed from the items.
    pub fn validate(self) -> Result<NewOrder, InvalidOrder> {
        let email = self.email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()).ok_or(InvalidOrder::MissingEmail)?;

        let items = match self.items {
            Some(Value::Array(lines)) if !lines.is_empty() => lines,
            _ => return Err(InvalidOrder::MissingItems),
        };

        let total = match self.total {
            None | Some(Value::Null) => return Err(InvalidOrder::MissingTotal),
            Some(value) => value.as_i64().ok_or(InvalidOrder::MalformedTotal)?,
        };

        let items = serde_json::from_value::<Vec<OrderLine>>(Value::Array(items))
            .map_err(|e| InvalidOrder::MalformedItems(e.to_string()))?;

        Ok(NewOrder { email, items, total })
    }
}

impl NewOrder {
    /// Total units across all lines. Wide enough that no set of `u32` quantities overflows it.
    pub fn item_count(&self) -> u64 { self.items.iter().map(|i| u64::from(i.qty)).sum() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission(body: Value) -> OrderSubmission { serde_json::from_value(body).unwrap() }

    fn line() -> Value { json!({ "productId": "x", "title": "T", "price": 9.99, "qty": 2, "image": "u" }) }

    #[test]
    fn test_rejects_empty_email() {
        let err = submission(json!({ "email": "", "items": [line()], "total": 5 })).validate().unwrap_err();
        assert_eq!(err, InvalidOrder::MissingEmail);
        let err = submission(json!({ "items": [line()], "total": 5 })).validate().unwrap_err();
        assert_eq!(err, InvalidOrder::MissingEmail);
    }

    #[test]
    fn test_rejects_empty_items() {
        let err = submission(json!({ "email": "a@b.com", "items": [], "total": 0 })).validate().unwrap_err();
        assert_eq!(err, InvalidOrder::MissingItems);
        let err = submission(json!({ "email": "a@b.com", "items": "nope", "total": 0 })).validate().unwrap_err();
        assert_eq!(err, InvalidOrder::MissingItems);
    }

    #[test]
    fn test_first_failure_wins() {
        let err = submission(json!({ "email": "", "items": [] })).validate().unwrap_err();
        assert_eq!(err, InvalidOrder::MissingEmail);
        let err = submission(json!({ "email": "a@b.com", "items": [] })).validate().unwrap_err();
        assert_eq!(err, InvalidOrder::MissingItems);
    }

    #[test]
    fn test_rejects_missing_or_bad_total() {
        let err = submission(json!({ "email": "a@b.com", "items": [line()] })).validate().unwrap_err();
        assert_eq!(err, InvalidOrder::MissingTotal);
        let err = submission(json!({ "email": "a@b.com", "items": [line()], "total": "19.98" })).validate().unwrap_err();
        assert_eq!(err, InvalidOrder::MalformedTotal);
    }

    #[test]
    fn test_rejects_malformed_line() {
        let err = submission(json!({ "email": "a@b.com", "items": [{ "title": "T" }], "total": 1 })).validate().unwrap_err();
        assert!(matches!(err, InvalidOrder::MalformedItems(_)));
    }

    #[test]
    fn test_accepts_valid_checkout() {
        let order = submission(json!({ "email": "a@b.com", "items": [line()], "total": 1998 })).validate().unwrap();
        assert_eq!(order.email, "a@b.com");
        assert_eq!(order.total, 1998);
        assert_eq!(order.items[0].price.cents(), 999);
        assert_eq!(order.item_count(), 2);
    }

    #[test]
    fn test_item_count_with_huge_quantities() {
        let big = json!({ "productId": "x", "title": "T", "price": 1.0, "qty": u32::MAX });
        let order = submission(json!({ "email": "a@b.com", "items": [big.clone(), big], "total": 1 })).validate().unwrap();
        assert_eq!(order.item_count(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_total_is_not_recomputed() {
        let order = submission(json!({ "email": "a@b.com", "items": [line()], "total": 1 })).validate().unwrap();
        assert_eq!(order.total, 1);
    }
}
