use chrono::NaiveDate;
use uuid::Uuid;

use super::clock::Clock;
use super::upcoming::{upcoming_charges, UpcomingCharge};
use crate::allocation::{summarize, PeriodTotal};
use crate::config::Config;
use crate::domain::{Category, Currency, Frequency, NotificationLead, Subscription};
use crate::errors::{Result, SubscriptionError};
use crate::notifications::{NotificationScheduler, ReminderPlanner, ScheduledAlert};
use crate::schedule::{ReportingMode, ReportingWindow};
use crate::storage::SubscriptionStore;

/// Field-level changes applied by [`SubscriptionManager::edit`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionPatch {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub billing_date: Option<NaiveDate>,
    /// `Some(None)` clears the end date.
    pub end_date: Option<Option<NaiveDate>>,
    pub frequency: Option<Frequency>,
    pub icon: Option<String>,
    pub category: Option<Category>,
    pub currency: Option<Currency>,
    pub notification: Option<NotificationLead>,
}

impl SubscriptionPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(self, subscription: &mut Subscription) {
        if let Some(name) = self.name {
            subscription.name = name;
        }
        if let Some(amount) = self.amount {
            subscription.amount = amount;
        }
        if let Some(billing_date) = self.billing_date {
            subscription.billing_date = billing_date;
        }
        if let Some(end_date) = self.end_date {
            subscription.end_date = end_date;
        }
        if let Some(frequency) = self.frequency {
            subscription.frequency = frequency;
        }
        if let Some(icon) = self.icon {
            subscription.icon = icon;
        }
        if let Some(category) = self.category {
            subscription.category = category;
        }
        if let Some(currency) = self.currency {
            subscription.currency = currency;
        }
        if let Some(notification) = self.notification {
            subscription.notification = notification;
        }
    }
}

/// Facade that coordinates the store, reminder scheduling and the clock.
///
/// Totals are derived from the store on every call; the manager holds no
/// cached amounts.
pub struct SubscriptionManager {
    store: Box<dyn SubscriptionStore>,
    scheduler: Box<dyn NotificationScheduler>,
    clock: Box<dyn Clock>,
    planner: ReminderPlanner,
    config: Config,
}

impl SubscriptionManager {
    pub fn new(
        store: Box<dyn SubscriptionStore>,
        scheduler: Box<dyn NotificationScheduler>,
        clock: Box<dyn Clock>,
        config: Config,
    ) -> Self {
        Self {
            store,
            scheduler,
            clock,
            planner: ReminderPlanner::from_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn list(&self) -> Result<Vec<Subscription>> {
        self.store.all()
    }

    pub fn get(&self, id: Uuid) -> Result<Subscription> {
        self.store.get(id)?.ok_or(SubscriptionError::NotFound(id))
    }

    /// Resolves a subscription by id, id prefix, or case-insensitive name.
    pub fn find(&self, query: &str) -> Result<Subscription> {
        let needle = query.trim();
        if let Ok(id) = Uuid::parse_str(needle) {
            return self.get(id);
        }
        let lowered = needle.to_lowercase();
        let all = self.store.all()?;
        let mut matches: Vec<Subscription> = all
            .iter()
            .filter(|sub| sub.name.to_lowercase() == lowered)
            .cloned()
            .collect();
        if matches.is_empty() && !lowered.is_empty() {
            matches = all
                .into_iter()
                .filter(|sub| sub.id.to_string().starts_with(&lowered))
                .collect();
        }
        match matches.len() {
            0 => Err(SubscriptionError::Validation(format!(
                "no subscription matches `{needle}`"
            ))),
            1 => Ok(matches.remove(0)),
            n => Err(SubscriptionError::Validation(format!(
                "`{needle}` matches {n} subscriptions; use the id"
            ))),
        }
    }

    /// Stores the subscription and schedules its reminders. If scheduling
    /// fails the record is removed again and the error returned.
    pub fn add(&mut self, subscription: Subscription) -> Result<Uuid> {
        subscription.validate()?;
        warn_if_inverted(&subscription);
        let id = subscription.id;
        self.store.insert(subscription.clone())?;
        let scheduled = match self.schedule(&subscription) {
            Ok(count) => count,
            Err(err) => {
                tracing::warn!(%id, error = %err, "scheduling failed; subscription not added");
                self.store.delete(id)?;
                return Err(err);
            }
        };
        tracing::info!(%id, name = %subscription.name, scheduled, "subscription added");
        Ok(id)
    }

    pub fn edit(&mut self, id: Uuid, patch: SubscriptionPatch) -> Result<Subscription> {
        let mut subscription = self.get(id)?;
        if patch.is_empty() {
            return Ok(subscription);
        }
        patch.apply(&mut subscription);
        subscription.validate()?;
        warn_if_inverted(&subscription);
        self.store.update(subscription.clone())?;
        let scheduled = self.schedule(&subscription)?;
        tracing::info!(%id, scheduled, "subscription updated");
        Ok(subscription)
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Subscription> {
        let removed = self.store.delete(id)?;
        self.scheduler.cancel(id)?;
        tracing::info!(%id, name = %removed.name, "subscription removed");
        Ok(removed)
    }

    /// Reporting window of `mode` containing today.
    pub fn current_window(&self, mode: ReportingMode) -> ReportingWindow {
        ReportingWindow::containing(mode, self.clock.today())
    }

    pub fn total(&self, mode: ReportingMode) -> Result<PeriodTotal> {
        self.total_for(&self.current_window(mode))
    }

    pub fn total_for(&self, window: &ReportingWindow) -> Result<PeriodTotal> {
        let subscriptions = self.store.all()?;
        Ok(summarize(&subscriptions, window, self.config.total_scope))
    }

    pub fn upcoming(&self) -> Result<Vec<UpcomingCharge>> {
        let subscriptions = self.store.all()?;
        Ok(upcoming_charges(&subscriptions, self.clock.today()))
    }

    /// Alerts that would be scheduled for the subscription right now.
    pub fn reminders(&self, id: Uuid) -> Result<Vec<ScheduledAlert>> {
        let subscription = self.get(id)?;
        Ok(self.planner.plan(&subscription, self.clock.now()))
    }

    /// Replaces the pending alerts of every subscription, e.g. after the
    /// reminder time changes or on application start.
    pub fn reschedule_all(&mut self) -> Result<usize> {
        let mut total = 0;
        for subscription in self.store.all()? {
            total += self.schedule(&subscription)?;
        }
        Ok(total)
    }

    fn schedule(&mut self, subscription: &Subscription) -> Result<usize> {
        self.scheduler.cancel(subscription.id)?;
        let alerts = self.planner.plan(subscription, self.clock.now());
        if !alerts.is_empty() {
            self.scheduler
                .schedule_occurrences(subscription.id, &alerts)?;
        }
        Ok(alerts.len())
    }
}

fn warn_if_inverted(subscription: &Subscription) {
    if subscription.ends_before_start() {
        tracing::warn!(
            id = %subscription.id,
            "end date precedes billing date; subscription will contribute nothing"
        );
    }
}
