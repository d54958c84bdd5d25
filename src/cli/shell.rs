use std::io::{self, BufRead};

use rustyline::{error::ReadlineError, DefaultEditor};
use shell_words::split;

use super::commands::{CliError, LoopControl, ShellContext};
use super::output;

const SCRIPT_ENV: &str = "SUBSCRIPTION_CORE_CLI_SCRIPT";
const PROMPT: &str = "subs> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliMode {
    Interactive,
    Script,
}

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::from_env()?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = DefaultEditor::new()?;
    output::info("Type `help` for the list of commands.");

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                if handle_line(context, trimmed) == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if handle_line(context, &line) == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> LoopControl {
    let tokens = match split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(format!("could not parse input: {err}"));
            return LoopControl::Continue;
        }
    };
    let Some((command, args)) = tokens.split_first() else {
        return LoopControl::Continue;
    };
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match context.dispatch(&command.to_lowercase(), &args) {
        Ok(control) => control,
        Err(err) => {
            output::error(err);
            LoopControl::Continue
        }
    }
}
