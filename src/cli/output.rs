use colored::Colorize;
use std::fmt;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

fn style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Info => text,
        MessageKind::Success => format!("{} {}", "[ok]".green().bold(), text),
        MessageKind::Warning => format!("{} {}", "WARNING:".yellow().bold(), text),
        MessageKind::Error => format!("{} {}", "ERROR:".red().bold(), text),
        MessageKind::Section => format!("=== {} ===", text.trim()).bold().to_string(),
    }
}

pub fn info(message: impl fmt::Display) {
    println!("{}", style(MessageKind::Info, message));
}

pub fn success(message: impl fmt::Display) {
    println!("{}", style(MessageKind::Success, message));
}

pub fn warning(message: impl fmt::Display) {
    println!("{}", style(MessageKind::Warning, message));
}

pub fn error(message: impl fmt::Display) {
    eprintln!("{}", style(MessageKind::Error, message));
}

pub fn section(title: impl fmt::Display) {
    println!("{}", style(MessageKind::Section, title));
}

/// `12.50 USD`
pub fn money(amount: f64, code: &str) -> String {
    format!("{amount:.2} {code}")
}
