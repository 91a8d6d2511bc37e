use shiplog_runtime::{Record, Result, Transport};
use std::sync::Mutex;

/// Keeps every shipped record in memory, in send order.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    records: Mutex<Vec<Record>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records sent so far.
    pub fn records(&self) -> Vec<Record> {
        self.lock().clone()
    }

    /// Remove and return the records sent so far.
    pub fn take(&self) -> Vec<Record> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Record>> {
        self.records.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Transport for MemoryTransport {
    fn send(&self, record: Record) -> Result<()> {
        self.lock().push(record);
        Ok(())
    }
}
