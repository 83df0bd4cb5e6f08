//! Order Aggregate
//!
//! The full order record: header fields, one delivery, one payment and an
//! ordered list of items. Field-level rules are declared with `validator`.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

// == Order ==
/// A complete order as published on the stream and persisted in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_transaction", skip_on_field_errors = false))]
pub struct Order {
    #[validate(length(min = 1, message = "must be provided"))]
    pub order_uid: String,
    #[validate(length(min = 1, message = "must be provided"))]
    pub track_number: String,
    #[validate(length(min = 1, message = "must be provided"))]
    pub entry: String,
    #[validate(nested)]
    pub delivery: Delivery,
    #[validate(nested)]
    pub payment: Payment,
    #[validate(length(min = 1, message = "must contain at least one item"), nested)]
    pub items: Vec<Item>,
    pub locale: String,
    #[validate(custom(function = "validate_signature_len"))]
    pub internal_signature: String,
    #[validate(length(min = 1, message = "must be provided"))]
    pub customer_id: String,
    #[validate(length(min = 1, message = "must be provided"))]
    pub delivery_service: String,
    #[validate(length(min = 1, message = "must be provided"))]
    pub shardkey: String,
    #[validate(range(min = 0, message = "must be non-negative"))]
    pub sm_id: i32,
    #[validate(custom(function = "validate_date_created"))]
    pub date_created: DateTime<Utc>,
    #[validate(length(min = 1, message = "must be provided"))]
    pub oof_shard: String,
}

// == Delivery ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Delivery {
    #[validate(length(min = 1, message = "must be provided"))]
    pub name: String,
    #[validate(length(min = 1, message = "must be provided"))]
    pub phone: String,
    #[validate(length(min = 1, message = "must be provided"))]
    pub zip: String,
    #[validate(length(min = 1, message = "must be provided"))]
    pub city: String,
    #[validate(length(min = 1, message = "must be provided"))]
    pub address: String,
    #[validate(length(min = 1, message = "must be provided"))]
    pub region: String,
    #[validate(
        length(min = 1, message = "must be provided"),
        email(message = "must be a valid email address")
    )]
    pub email: String,
}

// == Payment ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Payment {
    /// Must equal the owning order's `order_uid`.
    pub transaction: String,
    pub request_id: String,
    #[validate(length(min = 1, message = "must be provided"))]
    pub currency: String,
    #[validate(length(min = 1, message = "must be provided"))]
    pub provider: String,
    #[validate(range(min = 1, message = "must be positive"))]
    pub amount: i32,
    pub payment_dt: i64,
    #[validate(length(min = 1, message = "must be provided"))]
    pub bank: String,
    #[validate(range(min = 0, message = "must be non-negative"))]
    pub delivery_cost: i32,
    #[validate(range(min = 0, message = "must be non-negative"))]
    pub goods_total: i32,
    #[validate(range(min = 0, message = "must be non-negative"))]
    pub custom_fee: i32,
}

// == Item ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Item {
    #[validate(range(min = 1, message = "must be positive"))]
    pub chrt_id: i64,
    #[validate(length(min = 1, message = "must be provided"))]
    pub track_number: String,
    #[validate(range(min = 0, message = "must be non-negative"))]
    pub price: i32,
    #[validate(length(min = 1, message = "must be provided"))]
    pub rid: String,
    #[validate(length(min = 1, message = "must be provided"))]
    pub name: String,
    pub sale: i32,
    #[validate(length(min = 1, message = "must be provided"))]
    pub size: String,
    #[validate(range(min = 0, message = "must be non-negative"))]
    pub total_price: i32,
    #[validate(range(min = 1, message = "must be positive"))]
    pub nm_id: i64,
    #[validate(length(min = 1, message = "must be provided"))]
    pub brand: String,
    #[validate(range(min = 0, message = "must be non-negative"))]
    pub status: i32,
}

/// Maximum `internal_signature` length in bytes.
const MAX_SIGNATURE_BYTES: usize = 255;

/// Param naming the field a struct-level error belongs to.
const FIELD_PARAM: &str = "field";

fn validate_transaction(order: &Order) -> Result<(), ValidationError> {
    if order.payment.transaction != order.order_uid {
        let mut error = ValidationError::new("transaction_mismatch")
            .with_message(Cow::Borrowed("must match order_uid"));
        error.add_param(Cow::Borrowed(FIELD_PARAM), &"payment.transaction");
        return Err(error);
    }
    Ok(())
}

fn validate_signature_len(signature: &str) -> Result<(), ValidationError> {
    if signature.len() > MAX_SIGNATURE_BYTES {
        return Err(ValidationError::new("too_long")
            .with_message(Cow::Borrowed("must not be more than 255 bytes long")));
    }
    Ok(())
}

fn validate_date_created(date_created: &DateTime<Utc>) -> Result<(), ValidationError> {
    if date_created.timestamp() <= 0 {
        return Err(ValidationError::new("missing").with_message(Cow::Borrowed("must be provided")));
    }
    Ok(())
}

// == Error Flattening ==
/// Flattens nested validation errors into `path: message` lines,
/// e.g. `items[0].brand: must be provided`.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut out = Vec::new();
    collect_messages("", errors, &mut out);
    out.sort();
    out
}

fn collect_messages(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = match (prefix.is_empty(), &**field) {
            (_, "__all__") => prefix.to_string(),
            (true, name) => name.to_string(),
            (false, name) => format!("{}.{}", prefix, name),
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    // Struct-level errors may name the field they concern
                    let path = match error.params.get(FIELD_PARAM).and_then(|v| v.as_str()) {
                        Some(name) if path.is_empty() => name.to_string(),
                        Some(name) => format!("{}.{}", path, name),
                        None => path.clone(),
                    };
                    if path.is_empty() {
                        out.push(message);
                    } else {
                        out.push(format!("{}: {}", path, message));
                    }
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_messages(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

// == Demo Data ==
/// Builds a complete, valid order. Used by the demo producer and tests.
pub fn demo_order(order_uid: &str, date_created: DateTime<Utc>) -> Order {
    Order {
        order_uid: order_uid.to_string(),
        track_number: "WBILMTESTTRACK".to_string(),
        entry: "WBIL".to_string(),
        delivery: Delivery {
            name: "Test Testov".to_string(),
            phone: "+9720000000".to_string(),
            zip: "2639809".to_string(),
            city: "Kiryat Mozkin".to_string(),
            address: "Ploshad Mira 15".to_string(),
            region: "Kraiot".to_string(),
            email: "test@gmail.com".to_string(),
        },
        payment: Payment {
            transaction: order_uid.to_string(),
            request_id: String::new(),
            currency: "USD".to_string(),
            provider: "wbpay".to_string(),
            amount: 1817,
            payment_dt: date_created.timestamp(),
            bank: "alpha".to_string(),
            delivery_cost: 1500,
            goods_total: 317,
            custom_fee: 0,
        },
        items: vec![Item {
            chrt_id: 9934930,
            track_number: "WBILMTESTTRACK".to_string(),
            price: 453,
            rid: format!("{}-rid-0", order_uid),
            name: "Mascaras".to_string(),
            sale: 30,
            size: "0".to_string(),
            total_price: 317,
            nm_id: 2389212,
            brand: "Vivienne Sabo".to_string(),
            status: 202,
        }],
        locale: "en".to_string(),
        internal_signature: String::new(),
        customer_id: "test".to_string(),
        delivery_service: "meest".to_string(),
        shardkey: "9".to_string(),
        sm_id: 99,
        date_created,
        oof_shard: "1".to_string(),
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 11, 26, 6, 22, 19).unwrap()
    }

    #[test]
    fn test_demo_order_is_valid() {
        let order = demo_order("b563feb7b2b84b6test", created());
        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_order_json_field_names() {
        let order = demo_order("uid-1", created());
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["order_uid"], "uid-1");
        assert_eq!(json["delivery"]["email"], "test@gmail.com");
        assert_eq!(json["payment"]["transaction"], "uid-1");
        assert_eq!(json["items"][0]["chrt_id"], 9934930);
    }

    #[test]
    fn test_missing_header_field() {
        let mut order = demo_order("uid-1", created());
        order.track_number.clear();

        let errors = order.validate().unwrap_err();
        let messages = validation_messages(&errors);
        assert_eq!(messages, vec!["track_number: must be provided".to_string()]);
    }

    #[test]
    fn test_nested_item_path() {
        let mut order = demo_order("uid-1", created());
        order.items[0].brand.clear();

        let messages = validation_messages(&order.validate().unwrap_err());
        assert_eq!(messages, vec!["items[0].brand: must be provided".to_string()]);
    }

    #[test]
    fn test_empty_items_rejected() {
        let mut order = demo_order("uid-1", created());
        order.items.clear();

        let messages = validation_messages(&order.validate().unwrap_err());
        assert!(messages.contains(&"items: must contain at least one item".to_string()));
    }

    #[test]
    fn test_invalid_email() {
        let mut order = demo_order("uid-1", created());
        order.delivery.email = "not-an-email".to_string();

        let messages = validation_messages(&order.validate().unwrap_err());
        assert_eq!(
            messages,
            vec!["delivery.email: must be a valid email address".to_string()]
        );
    }

    #[test]
    fn test_transaction_must_match_uid() {
        let mut order = demo_order("uid-1", created());
        order.payment.transaction = "other".to_string();

        let messages = validation_messages(&order.validate().unwrap_err());
        assert_eq!(
            messages,
            vec!["payment.transaction: must match order_uid".to_string()]
        );
    }

    #[test]
    fn test_non_positive_amount() {
        let mut order = demo_order("uid-1", created());
        order.payment.amount = 0;

        let messages = validation_messages(&order.validate().unwrap_err());
        assert_eq!(messages, vec!["payment.amount: must be positive".to_string()]);
    }

    #[test]
    fn test_epoch_date_rejected() {
        let order = demo_order("uid-1", Utc.timestamp_opt(0, 0).unwrap());
        let messages = validation_messages(&order.validate().unwrap_err());
        assert_eq!(messages, vec!["date_created: must be provided".to_string()]);
    }

    #[test]
    fn test_long_signature_rejected() {
        let mut order = demo_order("uid-1", created());
        order.internal_signature = "x".repeat(256);

        let messages = validation_messages(&order.validate().unwrap_err());
        assert_eq!(
            messages,
            vec!["internal_signature: must not be more than 255 bytes long".to_string()]
        );
    }

    #[test]
    fn test_signature_limit_counts_bytes() {
        let mut order = demo_order("uid-1", created());
        // 200 characters, 400 bytes
        order.internal_signature = "я".repeat(200);
        assert!(order.validate().is_err());

        // 127 characters, 254 bytes
        order.internal_signature = "я".repeat(127);
        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_empty_email_is_missing() {
        let mut order = demo_order("uid-1", created());
        order.delivery.email.clear();

        let messages = validation_messages(&order.validate().unwrap_err());
        assert!(messages.contains(&"delivery.email: must be provided".to_string()));
    }
}
