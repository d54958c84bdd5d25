//! Amount of a single subscription attributable to one reporting window.
//!
//! Month and year windows follow separate rule sets. The year rules prorate
//! monthly subscriptions by a fixed 30-day divisor while the month rules use
//! calendar-month matching; the two are kept apart on purpose and must not be
//! folded into one parameterized formula.

use chrono::{Datelike, NaiveDate};

use crate::domain::{Frequency, Subscription};
use crate::schedule::calendar::month_index;
use crate::schedule::{DateWindow, ReportingMode, ReportingWindow};

const DAYS_PER_WEEK: f64 = 7.0;
const DAYS_PER_MONTH_APPROX: f64 = 30.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// Amount of `subscription` chargeable within `window`.
pub fn allocate(subscription: &Subscription, window: &ReportingWindow) -> f64 {
    match window.mode() {
        ReportingMode::Month => allocate_month(subscription, window.bounds()),
        ReportingMode::Year => allocate_year(subscription, window.bounds()),
    }
}

/// Part of the billing interval that overlaps `bounds`.
///
/// Without an end date the interval runs to the end of the window. Returns
/// `None` when the overlap is empty, including records whose end date is
/// before their billing date.
pub fn billed_interval(subscription: &Subscription, bounds: DateWindow) -> Option<DateWindow> {
    let end = subscription.end_date.unwrap_or(bounds.end);
    bounds.clip(subscription.billing_date, end)
}

/// Month-window rules: day-based for daily and weekly, billing-month based otherwise.
pub fn allocate_month(subscription: &Subscription, month: DateWindow) -> f64 {
    let Some(period) = billed_interval(subscription, month) else {
        return 0.0;
    };
    let days = period.days() as f64;
    let amount = subscription.amount;

    match subscription.frequency {
        Frequency::Daily => amount * days,
        Frequency::Weekly => amount * (days / DAYS_PER_WEEK).ceil(),
        Frequency::Monthly => {
            if is_billing_month(subscription, period.start) {
                amount
            } else {
                0.0
            }
        }
        Frequency::Yearly => {
            if is_yearly_billing_month(subscription, period.start) {
                amount / MONTHS_PER_YEAR
            } else {
                0.0
            }
        }
    }
}

/// Year-window rules: day-based for daily, weekly and monthly, billing-year based for yearly.
pub fn allocate_year(subscription: &Subscription, year: DateWindow) -> f64 {
    let Some(period) = billed_interval(subscription, year) else {
        return 0.0;
    };
    let days = period.days() as f64;
    let amount = subscription.amount;

    match subscription.frequency {
        Frequency::Daily => amount * days,
        Frequency::Weekly => amount * (days / DAYS_PER_WEEK).ceil(),
        Frequency::Monthly => amount * (days / DAYS_PER_MONTH_APPROX).ceil(),
        Frequency::Yearly => {
            if is_billing_year(subscription, period.start) {
                amount
            } else {
                0.0
            }
        }
    }
}

/// Month-granularity check for monthly subscriptions: every calendar month
/// from the anchor month on carries a billing. Day of month is ignored.
fn is_billing_month(subscription: &Subscription, date: NaiveDate) -> bool {
    month_index(date) >= month_index(subscription.billing_date)
}

/// Yearly subscriptions bill once a year, in the anchor's month of year.
fn is_yearly_billing_month(subscription: &Subscription, date: NaiveDate) -> bool {
    is_billing_month(subscription, date) && date.month() == subscription.billing_date.month()
}

/// Year-granularity recurrence check for yearly subscriptions.
fn is_billing_year(subscription: &Subscription, date: NaiveDate) -> bool {
    date.year() >= subscription.billing_date.year()
}
