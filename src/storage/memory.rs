use uuid::Uuid;

use super::{Result, SubscriptionStore};
use crate::domain::Subscription;
use crate::errors::SubscriptionError;

/// Volatile store used by tests and embedders that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Vec<Subscription>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscriptions(items: Vec<Subscription>) -> Self {
        Self { items }
    }
}

impl SubscriptionStore for MemoryStore {
    fn all(&self) -> Result<Vec<Subscription>> {
        Ok(self.items.clone())
    }

    fn get(&self, id: Uuid) -> Result<Option<Subscription>> {
        Ok(self.items.iter().find(|item| item.id == id).cloned())
    }

    fn insert(&mut self, subscription: Subscription) -> Result<()> {
        if self.items.iter().any(|item| item.id == subscription.id) {
            return Err(SubscriptionError::Duplicate(subscription.id));
        }
        self.items.push(subscription);
        Ok(())
    }

    fn update(&mut self, subscription: Subscription) -> Result<()> {
        let slot = self
            .items
            .iter_mut()
            .find(|item| item.id == subscription.id)
            .ok_or(SubscriptionError::NotFound(subscription.id))?;
        *slot = subscription;
        Ok(())
    }

    fn delete(&mut self, id: Uuid) -> Result<Subscription> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(SubscriptionError::NotFound(id))?;
        Ok(self.items.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Frequency;
    use chrono::NaiveDate;

    #[test]
    fn crud_round_trip() {
        let mut store = MemoryStore::new();
        let mut sub = Subscription::new(
            "Netflix",
            15.0,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            Frequency::Monthly,
        );
        store.insert(sub.clone()).unwrap();
        assert!(matches!(
            store.insert(sub.clone()),
            Err(SubscriptionError::Duplicate(_))
        ));

        sub.amount = 17.5;
        store.update(sub.clone()).unwrap();
        assert_eq!(store.get(sub.id).unwrap().map(|s| s.amount), Some(17.5));

        let removed = store.delete(sub.id).unwrap();
        assert_eq!(removed.name, "Netflix");
        assert!(store.all().unwrap().is_empty());
        assert!(matches!(store.delete(sub.id), Err(SubscriptionError::NotFound(_))));
    }
}
