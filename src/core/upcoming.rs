use std::fmt;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Currency, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueLabel {
    Today,
    Tomorrow,
    InDays(i64),
}

impl DueLabel {
    pub fn between(today: NaiveDate, due: NaiveDate) -> Self {
        match (due - today).num_days() {
            0 => DueLabel::Today,
            1 => DueLabel::Tomorrow,
            days => DueLabel::InDays(days),
        }
    }
}

impl fmt::Display for DueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueLabel::Today => f.write_str("DUE TODAY"),
            DueLabel::Tomorrow => f.write_str("DUE TOMORROW"),
            DueLabel::InDays(days) => write!(f, "DUE IN {days} DAYS"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingCharge {
    pub subscription_id: Uuid,
    pub name: String,
    pub icon: String,
    pub amount: f64,
    pub currency: Currency,
    pub due_date: NaiveDate,
    pub label: DueLabel,
}

/// Next charge of every subscription still billing on or after `today`,
/// soonest first. Finished subscriptions are left out.
pub fn upcoming_charges(subscriptions: &[Subscription], today: NaiveDate) -> Vec<UpcomingCharge> {
    let mut charges: Vec<UpcomingCharge> = subscriptions
        .iter()
        .filter_map(|sub| {
            let due_date = sub.next_due(today)?;
            Some(UpcomingCharge {
                subscription_id: sub.id,
                name: sub.name.clone(),
                icon: sub.icon.clone(),
                amount: sub.amount,
                currency: sub.currency,
                due_date,
                label: DueLabel::between(today, due_date),
            })
        })
        .collect();
    charges.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.name.cmp(&b.name)));
    charges
}
