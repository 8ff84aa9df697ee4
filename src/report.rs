#![cfg(feature = "std")]

//! Delivery of finished-game records to the results backend.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{info, warn};
use tokio::task::JoinHandle;

use crate::core::GameRecord;

/// Destination for finished-game records.
#[async_trait::async_trait]
pub trait ResultSink: Send + Sync {
    async fn submit(&self, record: &GameRecord) -> anyhow::Result<()>;
}

/// POSTs each record as JSON to a fixed URL.
pub struct HttpResultSink {
    url: String,
    timeout: Duration,
}

impl HttpResultSink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl ResultSink for HttpResultSink {
    async fn submit(&self, record: &GameRecord) -> anyhow::Result<()> {
        let url = self.url.clone();
        let timeout = self.timeout;
        let body = serde_json::to_value(record)?;
        let status = tokio::task::spawn_blocking(move || {
            ureq::post(&url)
                .timeout(timeout)
                .send_json(body)
                .map(|resp| resp.status())
        })
        .await??;
        info!("game result delivered ({})", status);
        Ok(())
    }
}

/// Keeps submitted records in memory.
#[derive(Clone, Default)]
pub struct MemoryResultSink {
    records: Arc<Mutex<Vec<GameRecord>>>,
}

impl MemoryResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything submitted so far. A push cannot leave the list half
    /// written, so records survive a panicked holder of the lock.
    pub fn records(&self) -> Vec<GameRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait::async_trait]
impl ResultSink for MemoryResultSink {
    async fn submit(&self, record: &GameRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record.clone());
        Ok(())
    }
}

/// Submit `record` in the background. Failures are logged and otherwise
/// ignored.
pub fn report_detached(sink: Arc<dyn ResultSink>, record: GameRecord) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = sink.submit(&record).await {
            warn!("failed to save game result: {}", e);
        }
    })
}
