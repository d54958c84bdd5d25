//! Reminder planning and the scheduling capability it is handed to.
//!
//! The planner turns a subscription into concrete alerts; a
//! [`NotificationScheduler`] owns delivery. Platform notification centres
//! implement the trait outside this crate.

mod memory;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::Subscription;
use crate::errors::Result;
use crate::schedule::calendar::shift_month;

pub use memory::InMemoryScheduler;

/// Upper bound on pending alerts per subscription (the platform limit for local notifications).
pub const MAX_PENDING_ALERTS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAlert {
    pub identifier: String,
    pub subscription_id: Uuid,
    pub billing_date: NaiveDate,
    pub fire_at: NaiveDateTime,
    pub title: String,
    pub body: String,
}

/// Stable identifier for the alert tied to one billing occurrence.
pub fn alert_identifier(subscription_id: Uuid, billing_date: NaiveDate) -> String {
    use chrono::Datelike;
    format!(
        "{}_{}_{}_{}",
        subscription_id,
        billing_date.year(),
        billing_date.month(),
        billing_date.day()
    )
}

/// Delivery side of reminders.
pub trait NotificationScheduler: Send {
    /// Registers one alert per occurrence. Alerts reuse identifiers, so
    /// scheduling the same occurrence twice replaces the earlier alert.
    fn schedule_occurrences(
        &mut self,
        subscription_id: Uuid,
        alerts: &[ScheduledAlert],
    ) -> Result<()>;

    /// Removes every pending alert for the subscription.
    fn cancel(&mut self, subscription_id: Uuid) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct ReminderPlanner {
    reminder_time: NaiveTime,
    horizon_months: u32,
}

impl ReminderPlanner {
    pub fn new(reminder_time: NaiveTime, horizon_months: u32) -> Self {
        Self {
            reminder_time,
            horizon_months,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.reminder_time, config.open_ended_horizon_months)
    }

    /// Last date to enumerate: the end date when set, otherwise the open-ended
    /// horizon counted from the later of the billing date and `today`.
    pub fn horizon_for(&self, subscription: &Subscription, today: NaiveDate) -> NaiveDate {
        if let Some(end) = subscription.end_date {
            return end;
        }
        let base = subscription.billing_date.max(today);
        shift_month(base, i64::from(self.horizon_months)).unwrap_or(NaiveDate::MAX)
    }

    /// Alerts still ahead of `now`, capped at [`MAX_PENDING_ALERTS`].
    pub fn plan(&self, subscription: &Subscription, now: NaiveDateTime) -> Vec<ScheduledAlert> {
        let Some(offset) = subscription.notification.offset() else {
            return Vec::new();
        };
        let today = now.date();
        let horizon = self.horizon_for(subscription, today);
        let first_billing = today.checked_add_signed(offset).unwrap_or(today);

        let mut alerts = Vec::new();
        let mut truncated = false;
        for billing_date in subscription.occurrences(horizon).starting_from(first_billing) {
            let Some(fire_at) = self.fire_time(billing_date, offset) else {
                continue;
            };
            if fire_at < now {
                continue;
            }
            if alerts.len() == MAX_PENDING_ALERTS {
                truncated = true;
                break;
            }
            alerts.push(ScheduledAlert {
                identifier: alert_identifier(subscription.id, billing_date),
                subscription_id: subscription.id,
                billing_date,
                fire_at,
                title: "Subscription reminder".to_string(),
                body: format!(
                    "{} is due on {}: {}{:.2}",
                    subscription.name,
                    billing_date.format("%Y-%m-%d"),
                    subscription.currency.symbol(),
                    subscription.amount
                ),
            });
        }

        if truncated {
            tracing::warn!(
                subscription = %subscription.id,
                limit = MAX_PENDING_ALERTS,
                "reminder plan truncated"
            );
        }
        alerts
    }

    fn fire_time(&self, billing_date: NaiveDate, offset: Duration) -> Option<NaiveDateTime> {
        billing_date
            .checked_sub_signed(offset)
            .map(|day| day.and_time(self.reminder_time))
    }
}
