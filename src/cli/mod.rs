//! Line-oriented shell over [`SubscriptionManager`](crate::core::SubscriptionManager).

mod commands;
pub mod output;
mod shell;

pub use commands::{CliError, LoopControl, ShellContext};
pub use shell::run_cli;
