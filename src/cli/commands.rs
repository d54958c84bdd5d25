use chrono::NaiveDate;
use thiserror::Error;

use super::output;
use crate::{
    catalog,
    config::ConfigManager,
    core::{Clock, FixedClock, SubscriptionManager, SubscriptionPatch, SystemClock},
    domain::{Frequency, Subscription},
    errors::SubscriptionError,
    notifications::InMemoryScheduler,
    schedule::{ReportingMode, ReportingWindow},
    storage::{JsonStore, LoadReport},
    utils::paths::{app_data_dir, store_file_in},
};

const TODAY_ENV: &str = "SUBSCRIPTION_CORE_TODAY";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] SubscriptionError),
    #[error("{0}")]
    Input(String),
    #[error("readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

type CommandResult = Result<LoopControl, CliError>;

/// Session state shared by the interactive and script front ends.
pub struct ShellContext {
    manager: SubscriptionManager,
}

impl ShellContext {
    pub fn new(manager: SubscriptionManager) -> Self {
        Self { manager }
    }

    /// Builds a context from the application data directory and environment.
    pub fn from_env() -> Result<Self, CliError> {
        let base = app_data_dir();
        let config = ConfigManager::with_base_dir(base.clone())?.load()?;
        let (store, report) = JsonStore::open(store_file_in(&base))?;
        print_load_report(&report);

        let clock: Box<dyn Clock> = match std::env::var(TODAY_ENV) {
            Ok(raw) => Box::new(FixedClock::on(parse_date(&raw)?)),
            Err(_) => Box::new(SystemClock),
        };

        let mut manager = SubscriptionManager::new(
            Box::new(store),
            Box::new(InMemoryScheduler::new()),
            clock,
            config,
        );
        let scheduled = manager.reschedule_all()?;
        tracing::debug!(scheduled, "reminders restored");
        Ok(Self::new(manager))
    }

    pub fn manager(&self) -> &SubscriptionManager {
        &self.manager
    }

    pub fn dispatch(&mut self, command: &str, args: &[&str]) -> CommandResult {
        match command {
            "help" => self.cmd_help(),
            "version" => self.cmd_version(),
            "list" => self.cmd_list(),
            "add" => self.cmd_add(args),
            "edit" => self.cmd_edit(args),
            "remove" => self.cmd_remove(args),
            "total" => self.cmd_total(args),
            "upcoming" => self.cmd_upcoming(),
            "reminders" => self.cmd_reminders(args),
            "catalog" => self.cmd_catalog(args),
            "exit" | "quit" => Ok(LoopControl::Exit),
            other => {
                output::warning(format!(
                    "unknown command `{other}`; type `help` for the list of commands"
                ));
                Ok(LoopControl::Continue)
            }
        }
    }

    fn cmd_help(&self) -> CommandResult {
        output::section("Commands");
        for (usage, summary) in HELP {
            output::info(format!("  {usage:<52} {summary}"));
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_version(&self) -> CommandResult {
        output::info(format!(
            "{} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ));
        Ok(LoopControl::Continue)
    }

    fn cmd_list(&self) -> CommandResult {
        let mut subscriptions = self.manager.list()?;
        if subscriptions.is_empty() {
            output::info("No subscriptions yet.");
            return Ok(LoopControl::Continue);
        }
        subscriptions.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        output::section("Subscriptions");
        for sub in &subscriptions {
            let end = sub
                .end_date
                .map(|date| format!(" until {date}"))
                .unwrap_or_default();
            output::info(format!(
                "{}  {:<20} {:>12}  {:<7} from {}{}  [{}]",
                short_id(sub),
                sub.name,
                output::money(sub.amount, sub.currency.code()),
                sub.frequency.label(),
                sub.billing_date,
                end,
                sub.category.label()
            ));
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_add(&mut self, args: &[&str]) -> CommandResult {
        let [name, amount, billing, rest @ ..] = args else {
            return Err(usage("add <name> <amount> <billing-date> [frequency] [end-date]"));
        };
        if rest.len() > 2 {
            return Err(usage("add <name> <amount> <billing-date> [frequency] [end-date]"));
        }
        let frequency = match rest.first() {
            Some(raw) => raw.parse::<Frequency>()?,
            None => Frequency::default(),
        };
        let mut subscription =
            Subscription::new(*name, parse_amount(amount)?, parse_date(billing)?, frequency)
                .with_currency(self.manager.config().default_currency);
        if let Some(raw) = rest.get(1) {
            subscription = subscription.with_end_date(parse_date(raw)?);
        }
        if let Some(template) = catalog::lookup(name) {
            subscription = subscription.with_icon(template.icon);
        }
        if subscription.ends_before_start() {
            output::warning("end date is before the billing date; this subscription will count as zero");
        }

        let id = self.manager.add(subscription)?;
        let added = self.manager.get(id)?;
        output::success(format!(
            "Added {} ({}) {} {}",
            added.name,
            short_id(&added),
            output::money(added.amount, added.currency.code()),
            added.frequency.label()
        ));
        Ok(LoopControl::Continue)
    }

    fn cmd_edit(&mut self, args: &[&str]) -> CommandResult {
        let [query, field, value] = args else {
            return Err(usage("edit <subscription> <field> <value>"));
        };
        let target = self.manager.find(query)?;
        let patch = build_patch(field, value)?;
        let updated = self.manager.edit(target.id, patch)?;
        if updated.ends_before_start() {
            output::warning("end date is before the billing date; this subscription will count as zero");
        }
        output::success(format!("Updated {} ({})", updated.name, short_id(&updated)));
        Ok(LoopControl::Continue)
    }

    fn cmd_remove(&mut self, args: &[&str]) -> CommandResult {
        let [query] = args else {
            return Err(usage("remove <subscription>"));
        };
        let target = self.manager.find(query)?;
        let removed = self.manager.remove(target.id)?;
        output::success(format!("Removed {}", removed.name));
        Ok(LoopControl::Continue)
    }

    fn cmd_total(&self, args: &[&str]) -> CommandResult {
        let (mode, period) = match args {
            [] => (self.manager.config().reporting_mode, None),
            [mode] => (mode.parse::<ReportingMode>()?, None),
            [mode, period] => (mode.parse::<ReportingMode>()?, Some(*period)),
            _ => return Err(usage("total [month|year] [YYYY-MM|YYYY]")),
        };
        let window = match period {
            Some(text) => ReportingWindow::parse(mode, text)?,
            None => self.manager.current_window(mode),
        };
        let summary = self.manager.total_for(&window)?;

        output::section(format!("Total for {}", window.label()));
        for contribution in summary.contributions.iter().filter(|c| c.amount != 0.0) {
            output::info(format!(
                "  {:<24} {:>12}",
                contribution.name,
                output::money(contribution.amount, contribution.currency.code())
            ));
        }
        let by_currency = summary.by_currency();
        if by_currency.len() > 1 {
            for (currency, amount) in &by_currency {
                output::info(format!("  subtotal {}", output::money(*amount, currency.code())));
            }
            output::warning("amounts in different currencies are summed without conversion");
        }
        let code = self.manager.config().default_currency.code();
        output::info(format!("Total: {}", output::money(summary.total, code)));
        Ok(LoopControl::Continue)
    }

    fn cmd_upcoming(&self) -> CommandResult {
        let charges = self.manager.upcoming()?;
        if charges.is_empty() {
            output::info("No upcoming charges.");
            return Ok(LoopControl::Continue);
        }
        output::section("Upcoming");
        for charge in charges {
            output::info(format!(
                "{:<20} {:>12}  {}  {}",
                charge.name,
                output::money(charge.amount, charge.currency.code()),
                charge.due_date,
                charge.label
            ));
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_reminders(&self, args: &[&str]) -> CommandResult {
        let [query] = args else {
            return Err(usage("reminders <subscription>"));
        };
        let target = self.manager.find(query)?;
        let alerts = self.manager.reminders(target.id)?;
        if alerts.is_empty() {
            output::info(format!("No reminders scheduled for {}.", target.name));
            return Ok(LoopControl::Continue);
        }
        output::section(format!("Reminders for {}", target.name));
        for alert in alerts {
            output::info(format!(
                "{}  fires {}  {}",
                alert.identifier,
                alert.fire_at.format("%Y-%m-%d %H:%M"),
                alert.body
            ));
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_catalog(&self, args: &[&str]) -> CommandResult {
        let query = args.join(" ");
        let matches = catalog::search(&query);
        if matches.is_empty() {
            output::info(format!("No services match `{query}`."));
            return Ok(LoopControl::Continue);
        }
        output::section("Catalog");
        for service in matches {
            output::info(format!("  {:<20} {}", service.name, service.icon));
        }
        Ok(LoopControl::Continue)
    }
}

const HELP: &[(&str, &str)] = &[
    ("help", "Show this help"),
    ("version", "Print the version"),
    ("list", "List subscriptions"),
    (
        "add <name> <amount> <billing-date> [frequency] [end]",
        "Add a subscription",
    ),
    ("edit <subscription> <field> <value>", "Change one field"),
    ("remove <subscription>", "Delete a subscription"),
    ("total [month|year] [YYYY-MM|YYYY]", "Amount due in a period"),
    ("upcoming", "Next charge of every subscription"),
    ("reminders <subscription>", "Pending reminder alerts"),
    ("catalog [query]", "Search known services"),
    ("exit", "Leave the shell"),
];

fn usage(text: &str) -> CliError {
    CliError::Input(format!("usage: {text}"))
}

fn short_id(subscription: &Subscription) -> String {
    subscription.id.to_string()[..8].to_string()
}

fn parse_date(raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| CliError::Input(format!("invalid date `{raw}` (expected YYYY-MM-DD)")))
}

fn parse_amount(raw: &str) -> Result<f64, CliError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CliError::Input(format!("invalid amount `{raw}`")))
}

fn build_patch(field: &str, value: &str) -> Result<SubscriptionPatch, CliError> {
    let mut patch = SubscriptionPatch::default();
    match field.to_lowercase().as_str() {
        "name" => patch.name = Some(value.to_string()),
        "amount" => patch.amount = Some(parse_amount(value)?),
        "billing" | "billing-date" => patch.billing_date = Some(parse_date(value)?),
        "end" | "end-date" => {
            patch.end_date = Some(match value.to_lowercase().as_str() {
                "none" | "-" => None,
                _ => Some(parse_date(value)?),
            })
        }
        "frequency" => patch.frequency = Some(value.parse()?),
        "icon" => patch.icon = Some(value.to_string()),
        "category" => patch.category = Some(value.parse()?),
        "currency" => patch.currency = Some(value.parse()?),
        "notify" | "notification" => patch.notification = Some(value.parse()?),
        other => {
            return Err(CliError::Input(format!(
                "unknown field `{other}` (name, amount, billing, end, frequency, icon, category, currency, notify)"
            )))
        }
    }
    Ok(patch)
}

fn print_load_report(report: &LoadReport) {
    for migration in &report.migrations {
        output::info(format!("migrated: {migration}"));
    }
    for warning in &report.warnings {
        output::warning(warning);
    }
    if report.quarantined > 0 {
        output::warning(format!(
            "{} record(s) with an unknown frequency were set aside and count as zero",
            report.quarantined
        ));
    }
}
