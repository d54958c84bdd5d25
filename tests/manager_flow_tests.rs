mod common;

use chrono::NaiveTime;
use common::{date, json_manager, memory_manager};
use subscription_core::{
    core::{DueLabel, SubscriptionPatch},
    domain::{Frequency, NotificationLead, Subscription},
    notifications::alert_identifier,
    schedule::{ReportingMode, ReportingWindow},
    storage::{JsonStore, SubscriptionStore},
};

#[test]
fn adding_schedules_reminders_up_to_the_horizon() {
    let (mut manager, scheduler) = memory_manager(date(2025, 3, 1));
    let id = manager
        .add(Subscription::new("Netflix", 15.0, date(2025, 3, 5), Frequency::Monthly))
        .unwrap();

    let alerts = scheduler.pending(id);
    // 5 March 2025 through 5 March 2026.
    assert_eq!(alerts.len(), 13);
    assert_eq!(alerts[0].identifier, alert_identifier(id, date(2025, 3, 5)));
    assert_eq!(alerts[0].identifier, format!("{id}_2025_3_5"));
    assert_eq!(
        alerts[0].fire_at,
        date(2025, 3, 5).and_time(NaiveTime::from_hms_opt(7, 0, 0).unwrap())
    );
    assert_eq!(alerts.last().unwrap().billing_date, date(2026, 3, 5));
}

#[test]
fn end_date_beyond_the_horizon_keeps_every_reminder() {
    let (mut manager, scheduler) = memory_manager(date(2025, 1, 1));
    let id = manager
        .add(
            Subscription::new("Gym", 30.0, date(2025, 1, 15), Frequency::Monthly)
                .with_end_date(date(2027, 12, 15)),
        )
        .unwrap();

    let alerts = scheduler.pending(id);
    // 15 January 2025 through 15 December 2027.
    assert_eq!(alerts.len(), 36);
    assert_eq!(alerts.last().unwrap().billing_date, date(2027, 12, 15));
}

#[test]
fn lead_time_moves_the_fire_date() {
    let (mut manager, scheduler) = memory_manager(date(2025, 3, 1));
    let id = manager
        .add(
            Subscription::new("Adobe", 120.0, date(2025, 3, 10), Frequency::Yearly)
                .with_notification(NotificationLead::WeekBefore),
        )
        .unwrap();
    let alerts = scheduler.pending(id);
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].fire_at.date(), date(2025, 3, 3));
    assert_eq!(alerts[0].billing_date, date(2025, 3, 10));
}

#[test]
fn editing_replaces_and_removing_cancels_reminders() {
    let (mut manager, scheduler) = memory_manager(date(2025, 3, 1));
    let id = manager
        .add(Subscription::new("Gym", 30.0, date(2025, 3, 5), Frequency::Monthly))
        .unwrap();
    assert_eq!(scheduler.pending(id).len(), 13);

    manager
        .edit(
            id,
            SubscriptionPatch {
                end_date: Some(Some(date(2025, 5, 31))),
                ..SubscriptionPatch::default()
            },
        )
        .unwrap();
    let billing: Vec<_> = scheduler.pending(id).iter().map(|a| a.billing_date).collect();
    assert_eq!(billing, vec![date(2025, 3, 5), date(2025, 4, 5), date(2025, 5, 5)]);

    manager
        .edit(
            id,
            SubscriptionPatch {
                notification: Some(NotificationLead::Never),
                ..SubscriptionPatch::default()
            },
        )
        .unwrap();
    assert!(scheduler.pending(id).is_empty());

    manager
        .edit(
            id,
            SubscriptionPatch {
                notification: Some(NotificationLead::OnDueDate),
                ..SubscriptionPatch::default()
            },
        )
        .unwrap();
    assert_eq!(scheduler.pending(id).len(), 3);

    manager.remove(id).unwrap();
    assert_eq!(scheduler.pending_count(), 0);
    assert!(manager.get(id).is_err());
}

#[test]
fn totals_follow_the_pinned_clock() {
    let (mut manager, _) = memory_manager(date(2025, 3, 20));
    manager
        .add(Subscription::new("Netflix", 15.0, date(2025, 3, 5), Frequency::Monthly))
        .unwrap();
    manager
        .add(Subscription::new("Adobe", 120.0, date(2025, 3, 1), Frequency::Yearly))
        .unwrap();

    let month = manager.total(ReportingMode::Month).unwrap();
    assert_eq!(month.window, ReportingWindow::month(2025, 3).unwrap());
    assert_eq!(month.total, 25.0);

    let year = manager.total(ReportingMode::Year).unwrap();
    // Netflix: 5 March ..= 31 December is 302 days, 11 periods.
    assert_eq!(year.total, 165.0 + 120.0);

    let april = manager
        .total_for(&ReportingWindow::month(2025, 4).unwrap())
        .unwrap();
    assert_eq!(april.total, 0.0);
}

#[test]
fn upcoming_lists_next_charges_soonest_first() {
    let (mut manager, _) = memory_manager(date(2025, 3, 4));
    manager
        .add(Subscription::new("Netflix", 15.0, date(2025, 1, 5), Frequency::Monthly))
        .unwrap();
    manager
        .add(Subscription::new("Coffee", 3.0, date(2025, 3, 4), Frequency::Daily))
        .unwrap();
    manager
        .add(
            Subscription::new("Ended", 9.0, date(2024, 1, 1), Frequency::Monthly)
                .with_end_date(date(2024, 6, 1)),
        )
        .unwrap();

    let upcoming = manager.upcoming().unwrap();
    assert_eq!(upcoming.len(), 2);
    assert_eq!(upcoming[0].name, "Coffee");
    assert_eq!(upcoming[0].label, DueLabel::Today);
    assert_eq!(upcoming[1].due_date, date(2025, 3, 5));
    assert_eq!(upcoming[1].label.to_string(), "DUE TOMORROW");
}

#[test]
fn json_backed_manager_persists_edits() {
    let (mut manager, _, path) = json_manager(date(2025, 3, 1));
    let id = manager
        .add(Subscription::new("Netflix", 15.0, date(2025, 3, 5), Frequency::Monthly))
        .unwrap();
    manager
        .edit(
            id,
            SubscriptionPatch {
                amount: Some(17.5),
                frequency: Some(Frequency::Yearly),
                ..SubscriptionPatch::default()
            },
        )
        .unwrap();

    let (store, _) = JsonStore::open(&path).unwrap();
    let saved = store.get(id).unwrap().unwrap();
    assert_eq!(saved.amount, 17.5);
    assert_eq!(saved.frequency, Frequency::Yearly);
}

#[test]
fn inverted_records_are_accepted_but_count_as_zero() {
    let (mut manager, scheduler) = memory_manager(date(2025, 3, 1));
    let id = manager
        .add(
            Subscription::new("Backwards", 20.0, date(2025, 3, 10), Frequency::Monthly)
                .with_end_date(date(2025, 3, 1)),
        )
        .unwrap();
    assert!(scheduler.pending(id).is_empty());
    assert_eq!(manager.total(ReportingMode::Month).unwrap().total, 0.0);
    assert_eq!(manager.total(ReportingMode::Year).unwrap().total, 0.0);
}
