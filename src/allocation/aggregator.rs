use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::allocator::{allocate, billed_interval};
use crate::domain::{Category, Currency, Subscription};
use crate::schedule::ReportingWindow;

/// Which subscriptions take part in a window total.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TotalScope {
    /// Only subscriptions whose billing date lies inside the window.
    #[default]
    AnchoredInWindow,
    /// Every subscription with a billable interval overlapping the window.
    Active,
}

impl TotalScope {
    pub fn includes(self, subscription: &Subscription, window: &ReportingWindow) -> bool {
        match self {
            TotalScope::AnchoredInWindow => window.contains(subscription.billing_date),
            TotalScope::Active => billed_interval(subscription, window.bounds()).is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub subscription_id: Uuid,
    pub name: String,
    pub category: Category,
    pub currency: Currency,
    pub amount: f64,
}

/// Headline total for a window plus the per-subscription amounts behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTotal {
    pub window: ReportingWindow,
    pub scope: TotalScope,
    pub total: f64,
    pub contributions: Vec<Contribution>,
}

impl PeriodTotal {
    pub fn by_category(&self) -> BTreeMap<Category, f64> {
        let mut totals = BTreeMap::new();
        for item in &self.contributions {
            *totals.entry(item.category).or_insert(0.0) += item.amount;
        }
        totals
    }

    /// Sums per stored currency; amounts are never converted.
    pub fn by_currency(&self) -> BTreeMap<Currency, f64> {
        let mut totals = BTreeMap::new();
        for item in &self.contributions {
            *totals.entry(item.currency).or_insert(0.0) += item.amount;
        }
        totals
    }
}

/// Sum of allocations for the subscriptions `scope` admits into `window`.
pub fn total_for(subscriptions: &[Subscription], window: &ReportingWindow, scope: TotalScope) -> f64 {
    subscriptions
        .iter()
        .filter(|sub| scope.includes(sub, window))
        .map(|sub| allocate(sub, window))
        .sum()
}

pub fn summarize(
    subscriptions: &[Subscription],
    window: &ReportingWindow,
    scope: TotalScope,
) -> PeriodTotal {
    let contributions: Vec<Contribution> = subscriptions
        .iter()
        .filter(|sub| scope.includes(sub, window))
        .map(|sub| Contribution {
            subscription_id: sub.id,
            name: sub.name.clone(),
            category: sub.category,
            currency: sub.currency,
            amount: allocate(sub, window),
        })
        .collect();
    let total: f64 = contributions.iter().map(|item| item.amount).sum();
    tracing::debug!(
        window = %window,
        included = contributions.len(),
        total,
        "recomputed period total"
    );
    PeriodTotal {
        window: *window,
        scope,
        total,
        contributions,
    }
}
