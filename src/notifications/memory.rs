use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use super::{NotificationScheduler, ScheduledAlert};
use crate::errors::{Result, SubscriptionError};

type PendingMap = HashMap<Uuid, Vec<ScheduledAlert>>;

/// Scheduler that keeps pending alerts in memory, keyed by subscription.
///
/// Clones share the same pending set, so a caller can keep a handle for
/// inspection after boxing one into a manager.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScheduler {
    pending: Arc<Mutex<PendingMap>>,
}

impl InMemoryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self, subscription_id: Uuid) -> Vec<ScheduledAlert> {
        self.pending
            .lock()
            .map(|map| map.get(&subscription_id).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .map(|map| map.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, PendingMap>> {
        self.pending
            .lock()
            .map_err(|_| SubscriptionError::Notification("pending alert set poisoned".into()))
    }
}

impl NotificationScheduler for InMemoryScheduler {
    fn schedule_occurrences(
        &mut self,
        subscription_id: Uuid,
        alerts: &[ScheduledAlert],
    ) -> Result<()> {
        let mut map = self.lock()?;
        let entry = map.entry(subscription_id).or_default();
        for alert in alerts {
            entry.retain(|existing| existing.identifier != alert.identifier);
            entry.push(alert.clone());
        }
        entry.sort_by_key(|alert| alert.fire_at);
        tracing::debug!(subscription = %subscription_id, count = entry.len(), "alerts scheduled");
        Ok(())
    }

    fn cancel(&mut self, subscription_id: Uuid) -> Result<()> {
        if let Some(removed) = self.lock()?.remove(&subscription_id) {
            tracing::debug!(subscription = %subscription_id, count = removed.len(), "alerts cancelled");
        }
        Ok(())
    }
}
