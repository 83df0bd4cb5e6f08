//! Ingestion Task
//!
//! Runs the order stream consumer as a single sequential loop.

use tokio::task::JoinHandle;
use tracing::info;

use crate::ingest::{run_ingestion, IngestReport, MessageSource, OrderHandler};

/// Spawns the ingestion loop over `source`.
///
/// The task ends when the source is exhausted; abort the handle to stop it
/// earlier during shutdown.
pub fn spawn_ingest_task<S>(source: S, handler: OrderHandler) -> JoinHandle<IngestReport>
where
    S: MessageSource + 'static,
{
    tokio::spawn(async move {
        info!("Starting order ingestion");
        run_ingestion(source, handler).await
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::ChannelSource;
    use crate::models::demo_order;
    use crate::storage::{MemoryStore, OrderStore};
    use chrono::Utc;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_ingest_task_stores_and_finishes() {
        let store = Arc::new(MemoryStore::new());
        let (tx, source) = ChannelSource::new(4);
        let handle = spawn_ingest_task(source, OrderHandler::new(store.clone()));

        let payload = serde_json::to_vec(&demo_order("uid-1", Utc::now())).unwrap();
        tx.send(payload).await.unwrap();
        drop(tx);

        let report = handle.await.unwrap();
        assert_eq!(report.stored, 1);
        assert!(store.get_by_id("uid-1").await.is_ok());
    }

    #[tokio::test]
    async fn test_ingest_task_can_be_aborted() {
        let store = Arc::new(MemoryStore::new());
        let (_tx, source) = ChannelSource::new(4);
        let handle = spawn_ingest_task(source, OrderHandler::new(store));

        handle.abort();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
