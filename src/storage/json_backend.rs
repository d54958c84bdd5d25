use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{LoadReport, Result, SubscriptionStore};
use crate::{
    domain::{Category, Currency, Frequency, NotificationLead, Subscription, DEFAULT_ICON},
    errors::SubscriptionError,
    utils::paths::{app_data_dir, store_file_in, write_atomic},
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// On-disk shape of a subscription. The frequency stays a free-form string so
/// records written by older builds, or edited by hand, still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredSubscription {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub billing_date: NaiveDate,
    #[serde(default = "default_frequency_label")]
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub notification: NotificationLead,
}

fn default_frequency_label() -> String {
    Frequency::default().label().to_string()
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

impl From<&Subscription> for StoredSubscription {
    fn from(sub: &Subscription) -> Self {
        Self {
            id: sub.id,
            name: sub.name.clone(),
            amount: sub.amount,
            billing_date: sub.billing_date,
            frequency: sub.frequency.label().to_string(),
            end_date: sub.end_date,
            icon: sub.icon.clone(),
            category: sub.category,
            currency: sub.currency,
            notification: sub.notification,
        }
    }
}

impl StoredSubscription {
    /// Converts into the in-memory record, reporting whether the frequency
    /// label had to be normalized.
    pub fn into_subscription(self) -> Result<(Subscription, bool)> {
        let (frequency, migrated) = Frequency::parse_legacy(&self.frequency)?;
        let subscription = Subscription {
            id: self.id,
            name: self.name,
            amount: self.amount,
            billing_date: self.billing_date,
            frequency,
            end_date: self.end_date,
            icon: self.icon,
            category: self.category,
            currency: self.currency,
            notification: self.notification,
        };
        Ok((subscription, migrated))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default = "schema_version_default")]
    schema_version: u8,
    #[serde(default)]
    subscriptions: Vec<StoredSubscription>,
}

fn schema_version_default() -> u8 {
    CURRENT_SCHEMA_VERSION
}

/// JSON file store. Every mutation rewrites the file atomically.
///
/// Records whose frequency cannot be parsed are quarantined: they are written
/// back untouched but never handed to callers, so they add nothing to totals.
pub struct JsonStore {
    path: PathBuf,
    active: Vec<Subscription>,
    quarantined: Vec<StoredSubscription>,
}

impl JsonStore {
    /// Opens the store in the default application directory.
    pub fn open_default() -> Result<(Self, LoadReport)> {
        Self::open(store_file_in(&app_data_dir()))
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<(Self, LoadReport)> {
        let path = path.into();
        let mut store = Self {
            path,
            active: Vec::new(),
            quarantined: Vec::new(),
        };
        let report = store.reload()?;
        Ok((store, report))
    }

    /// Re-reads the backing file, replacing the in-memory state.
    pub fn reload(&mut self) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        self.active.clear();
        self.quarantined.clear();
        if !self.path.exists() {
            return Ok(report);
        }

        let data = fs::read_to_string(&self.path)?;
        let document: StoreDocument = serde_json::from_str(&data)?;
        if document.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(SubscriptionError::Validation(format!(
                "store schema v{} is newer than supported v{}",
                document.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }

        let mut seen = HashSet::new();
        for record in document.subscriptions {
            if !seen.insert(record.id) {
                report
                    .warnings
                    .push(format!("duplicate subscription {} ignored", record.id));
                continue;
            }
            let raw_frequency = record.frequency.clone();
            match record.clone().into_subscription() {
                Ok((subscription, migrated)) => {
                    if migrated {
                        report.migrations.push(format!(
                            "{}: frequency `{}` normalized to `{}`",
                            subscription.name, raw_frequency, subscription.frequency
                        ));
                    }
                    if subscription.ends_before_start() {
                        report.warnings.push(format!(
                            "{}: end date precedes billing date; it will contribute nothing",
                            subscription.name
                        ));
                    }
                    self.active.push(subscription);
                }
                Err(err) => {
                    tracing::warn!(id = %record.id, error = %err, "subscription quarantined");
                    report.warnings.push(format!("{}: {err}; record quarantined", record.name));
                    self.quarantined.push(record);
                }
            }
        }

        report.loaded = self.active.len();
        report.quarantined = self.quarantined.len();
        tracing::info!(
            path = %self.path.display(),
            loaded = report.loaded,
            quarantined = report.quarantined,
            "subscription store loaded"
        );
        Ok(report)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn quarantined(&self) -> &[StoredSubscription] {
        &self.quarantined
    }

    fn persist(&self, active: &[Subscription]) -> Result<()> {
        let mut subscriptions: Vec<StoredSubscription> =
            active.iter().map(StoredSubscription::from).collect();
        subscriptions.extend(self.quarantined.iter().cloned());
        let document = StoreDocument {
            schema_version: CURRENT_SCHEMA_VERSION,
            subscriptions,
        };
        let json = serde_json::to_string_pretty(&document)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    fn commit(&mut self, next: Vec<Subscription>) -> Result<()> {
        self.persist(&next)?;
        self.active = next;
        Ok(())
    }

    fn is_known(&self, id: Uuid) -> bool {
        self.active.iter().any(|item| item.id == id)
            || self.quarantined.iter().any(|item| item.id == id)
    }
}

impl SubscriptionStore for JsonStore {
    fn all(&self) -> Result<Vec<Subscription>> {
        Ok(self.active.clone())
    }

    fn get(&self, id: Uuid) -> Result<Option<Subscription>> {
        Ok(self.active.iter().find(|item| item.id == id).cloned())
    }

    fn insert(&mut self, subscription: Subscription) -> Result<()> {
        if self.is_known(subscription.id) {
            return Err(SubscriptionError::Duplicate(subscription.id));
        }
        let mut next = self.active.clone();
        next.push(subscription);
        self.commit(next)
    }

    fn update(&mut self, subscription: Subscription) -> Result<()> {
        let mut next = self.active.clone();
        let slot = next
            .iter_mut()
            .find(|item| item.id == subscription.id)
            .ok_or(SubscriptionError::NotFound(subscription.id))?;
        *slot = subscription;
        self.commit(next)
    }

    fn delete(&mut self, id: Uuid) -> Result<Subscription> {
        let mut next = self.active.clone();
        let index = next
            .iter()
            .position(|item| item.id == id)
            .ok_or(SubscriptionError::NotFound(id))?;
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_record_converts_with_migration_flag() {
        let sub = Subscription::new(
            "Adobe",
            120.0,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            Frequency::Yearly,
        );
        let mut stored = StoredSubscription::from(&sub);
        assert_eq!(stored.frequency, "Yearly");
        let (back, migrated) = stored.clone().into_subscription().unwrap();
        assert_eq!(back, sub);
        assert!(!migrated);

        stored.frequency = "annual".into();
        let (_, migrated) = stored.clone().into_subscription().unwrap();
        assert!(migrated);

        stored.frequency = "Quarterly".into();
        assert!(matches!(
            stored.into_subscription(),
            Err(SubscriptionError::UnknownFrequency(_))
        ));
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (store, report) = JsonStore::open(dir.path().join("subscriptions.json")).unwrap();
        assert!(store.all().unwrap().is_empty());
        assert!(report.is_clean());
        assert!(!store.path().exists());
    }
}
