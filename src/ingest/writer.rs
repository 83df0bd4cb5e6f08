//! Ingestion Writer
//!
//! Decode, validate and persist one order per message. Every failure is
//! terminal for its message: it is logged and the stream moves on.

use std::sync::Arc;

use tracing::{error, info};
use validator::Validate;

use super::source::{Message, MessageSource};
use crate::error::IngestError;
use crate::models::{validation_messages, Order};
use crate::storage::OrderStore;

/// Turns stream messages into stored orders.
#[derive(Clone)]
pub struct OrderHandler {
    store: Arc<dyn OrderStore>,
}

impl OrderHandler {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    /// Processes one message. Returns the stored order's id on success.
    pub async fn handle(&self, message: &Message) -> Result<String, IngestError> {
        let order: Order = serde_json::from_slice(&message.payload).map_err(|err| {
            error!(offset = message.offset, error = %err, "json unmarshal failed");
            IngestError::from(err)
        })?;

        if let Err(errors) = order.validate() {
            let errors = validation_messages(&errors);
            error!(
                offset = message.offset,
                order_uid = %order.order_uid,
                errors = ?errors,
                "order validation failed"
            );
            return Err(IngestError::Validation {
                order_uid: order.order_uid,
                errors,
            });
        }

        if let Err(err) = self.store.save(&order).await {
            error!(
                offset = message.offset,
                order_uid = %order.order_uid,
                error = %err,
                "failed to save order"
            );
            return Err(err.into());
        }

        info!(
            order_uid = %order.order_uid,
            offset = message.offset,
            items_count = order.items.len(),
            "order processed successfully"
        );
        Ok(order.order_uid)
    }
}

/// Totals for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub stored: u64,
    pub rejected: u64,
}

/// Drains `source` sequentially through `handler`.
///
/// Rejected messages are skipped, never retried. Returns once the source is
/// exhausted.
pub async fn run_ingestion<S>(mut source: S, handler: OrderHandler) -> IngestReport
where
    S: MessageSource,
{
    let mut report = IngestReport::default();

    while let Some(message) = source.next_message().await {
        match handler.handle(&message).await {
            Ok(_) => report.stored += 1,
            Err(_) => report.rejected += 1,
        }
    }

    info!(
        stored = report.stored,
        rejected = report.rejected,
        "Order stream ended"
    );
    report
}
