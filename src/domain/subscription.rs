use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, Currency, Frequency, NotificationLead};
use crate::errors::SubscriptionError;
use crate::schedule::Occurrences;

pub const DEFAULT_ICON: &str = "creditcard.fill";

/// A recurring payment recorded by the user.
///
/// `billing_date` is the phase anchor: every occurrence is derived by stepping
/// forward from it by `frequency`. `amount` is the charge per occurrence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub billing_date: NaiveDate,
    #[serde(default)]
    pub frequency: Frequency,
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

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

impl Subscription {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        billing_date: NaiveDate,
        frequency: Frequency,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            billing_date,
            frequency,
            end_date: None,
            icon: default_icon(),
            category: Category::default(),
            currency: Currency::default(),
            notification: NotificationLead::default(),
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_notification(mut self, notification: NotificationLead) -> Self {
        self.notification = notification;
        self
    }

    /// Checks the fields a user can get wrong on the add/edit form.
    pub fn validate(&self) -> Result<(), SubscriptionError> {
        if self.name.trim().is_empty() {
            return Err(SubscriptionError::Validation(
                "subscription name must not be empty".into(),
            ));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(SubscriptionError::Validation(format!(
                "amount must be a non-negative number (got {})",
                self.amount
            )));
        }
        Ok(())
    }

    /// True when the end date precedes the first billing date; such records
    /// have no occurrences and contribute nothing to totals.
    pub fn ends_before_start(&self) -> bool {
        self.end_date.is_some_and(|end| end < self.billing_date)
    }

    /// Billing dates from the anchor up to `horizon` or the end date, whichever is earlier.
    pub fn occurrences(&self, horizon: NaiveDate) -> Occurrences {
        let upper = match self.end_date {
            Some(end) => end.min(horizon),
            None => horizon,
        };
        Occurrences::new(self.billing_date, self.frequency, upper)
    }

    /// First billing date on or after `date`, honouring the end date.
    pub fn next_due(&self, date: NaiveDate) -> Option<NaiveDate> {
        let upper = self.end_date.unwrap_or(NaiveDate::MAX);
        Occurrences::new(self.billing_date, self.frequency, upper)
            .starting_from(date)
            .next()
    }
}
