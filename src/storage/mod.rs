//! Persistence boundary for subscription records.

pub mod json_backend;
pub mod memory;

use uuid::Uuid;

use crate::domain::Subscription;
use crate::errors::SubscriptionError;

pub type Result<T> = std::result::Result<T, SubscriptionError>;

/// Abstraction over stores that own the subscription collection.
///
/// Readers always receive fresh copies of the current records; nothing
/// downstream caches them beyond a single call.
pub trait SubscriptionStore: Send + Sync {
    fn all(&self) -> Result<Vec<Subscription>>;
    fn get(&self, id: Uuid) -> Result<Option<Subscription>>;
    fn insert(&mut self, subscription: Subscription) -> Result<()>;
    fn update(&mut self, subscription: Subscription) -> Result<()>;
    fn delete(&mut self, id: Uuid) -> Result<Subscription>;
}

/// Outcome of opening a persisted store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub quarantined: usize,
    pub warnings: Vec<String>,
    pub migrations: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.migrations.is_empty()
    }
}

pub use json_backend::{JsonStore, StoredSubscription, CURRENT_SCHEMA_VERSION};
pub use memory::MemoryStore;
