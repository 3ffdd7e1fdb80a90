use std::sync::atomic::{AtomicU64, Ordering};

use super::Bridge;
use crate::Result;

/// Bridge that only logs what it would send
#[derive(Debug, Default)]
pub struct LogBridge {
    sent: AtomicU64,
}

impl LogBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of payloads received so far
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

impl Bridge for LogBridge {
    fn bridge_type(&self) -> &'static str {
        "log"
    }

    fn send_data(&self, data: &[u8]) -> Result<()> {
        self.sent.fetch_add(1, Ordering::Relaxed);
        tracing::info!("Data sent: {:?}", data);
        Ok(())
    }
}
