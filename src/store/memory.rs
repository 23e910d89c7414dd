//! In-memory request store for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{RequestStore, StoreError, StoreResult, TerminalOutcome};
use crate::request::{RequestId, VerificationRequest, VerificationStatus};

/// In-memory request store for testing.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<RequestId, VerificationRequest>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records (for test assertions).
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RequestStore for MemoryStore {
    async fn put(&self, record: &VerificationRequest) -> StoreResult<()> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.id) {
            return Err(StoreError::DuplicateId(record.id.to_string()));
        }
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, id: &RequestId) -> StoreResult<Option<VerificationRequest>> {
        Ok(self.records.lock().unwrap().get(id).cloned())
    }

    async fn update_if_pending(
        &self,
        id: &RequestId,
        outcome: &TerminalOutcome,
    ) -> StoreResult<bool> {
        let mut records = self.records.lock().unwrap();
        let Some(record) = records.get_mut(id) else {
            return Ok(false);
        };
        if record.status != VerificationStatus::Pending {
            return Ok(false);
        }
        match outcome {
            TerminalOutcome::Completed {
                result,
                verified_at,
            } => {
                record.status = VerificationStatus::Completed;
                record.result = Some(result.clone());
                record.verified_at = Some(*verified_at);
            }
            TerminalOutcome::Failed => {
                record.status = VerificationStatus::Failed;
            }
        }
        Ok(true)
    }
}
