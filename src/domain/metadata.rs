//! Presentation metadata carried by subscriptions. None of it affects amounts.

use std::{fmt, str::FromStr};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::errors::SubscriptionError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Gbp];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.symbol())
    }
}

impl FromStr for Currency {
    type Err = SubscriptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let code = value.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|currency| code == currency.code() || code.starts_with(&format!("{} ", currency.code())))
            .ok_or_else(|| SubscriptionError::Validation(format!("unsupported currency `{value}`")))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Category {
    #[default]
    General,
    Entertainment,
    Productivity,
    Utilities,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::General,
        Category::Entertainment,
        Category::Productivity,
        Category::Utilities,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Entertainment => "Entertainment",
            Category::Productivity => "Productivity",
            Category::Utilities => "Utilities",
        }
    }

    /// Symbol name shown next to the category.
    pub fn icon(self) -> &'static str {
        match self {
            Category::General => "tag.fill",
            Category::Entertainment => "play.fill",
            Category::Productivity => "briefcase.fill",
            Category::Utilities => "bolt.fill",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = SubscriptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| SubscriptionError::Validation(format!("unknown category `{value}`")))
    }
}

/// How far ahead of a billing date the reminder fires.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum NotificationLead {
    Never,
    #[default]
    OnDueDate,
    DayBefore,
    WeekBefore,
}

impl NotificationLead {
    pub const ALL: [NotificationLead; 4] = [
        NotificationLead::Never,
        NotificationLead::OnDueDate,
        NotificationLead::DayBefore,
        NotificationLead::WeekBefore,
    ];

    /// Offset subtracted from the billing date, or `None` when reminders are off.
    pub fn offset(self) -> Option<Duration> {
        match self {
            NotificationLead::Never => None,
            NotificationLead::OnDueDate => Some(Duration::zero()),
            NotificationLead::DayBefore => Duration::try_days(1),
            NotificationLead::WeekBefore => Duration::try_days(7),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NotificationLead::Never => "Never",
            NotificationLead::OnDueDate => "On due date",
            NotificationLead::DayBefore => "1 day before",
            NotificationLead::WeekBefore => "1 week before",
        }
    }
}

impl fmt::Display for NotificationLead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NotificationLead {
    type Err = SubscriptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "never" | "off" => Ok(NotificationLead::Never),
            "due" | "on due date" | "same-day" => Ok(NotificationLead::OnDueDate),
            "day" | "1 day before" | "day-before" => Ok(NotificationLead::DayBefore),
            "week" | "1 week before" | "week-before" => Ok(NotificationLead::WeekBefore),
            _ => Err(SubscriptionError::Validation(format!(
                "unknown notification setting `{value}`"
            ))),
        }
    }
}
