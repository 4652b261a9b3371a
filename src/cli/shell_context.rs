use std::env;

use chrono::NaiveDate;
use strsim::levenshtein;
use thiserror::Error;
use tracing::info;

use crate::cli::commands;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::config::{Config, ConfigManager};
use crate::domain::validation::DATE_FORMAT;
use crate::engine::services::ServiceError;
use crate::engine::{Clock, FixedClock, Notification, Session, SystemClock};
use crate::errors::{CliError, ConfigError, WorkflowError};

pub const SCRIPT_ENV: &str = "BIZDASH_CLI_SCRIPT";
pub const TODAY_ENV: &str = "BIZDASH_TODAY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("exit requested")]
    ExitRequested,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub session: Session,
    pub clock: Box<dyn Clock>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        output::set_preferences(OutputPreferences {
            plain_mode: mode == CliMode::Script,
            quiet_mode: false,
        });
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        Self::with_parts(mode, config_manager, config, clock_from_env()?)
    }

    pub fn with_parts(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let settings = config.workflow_settings(clock.today())?;
        let session = if config.seed_on_start {
            Session::seeded(settings, clock.as_ref())
        } else {
            Session::empty(settings, clock.as_ref())
        };
        info!(?mode, config = %config_manager.path().display(), "shell ready");

        Ok(Self {
            mode,
            registry,
            config_manager,
            config,
            session,
            clock,
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        "bizdash> ".to_string()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        let result = handler(self, args);
        self.flush_notifications();
        match result {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Did you mean `{name}`?"));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Workflow(WorkflowError::Validation(errors)) => {
                for (field, message) in errors.iter() {
                    output::error(format!("{field}: {message}"));
                }
            }
            // The workflow already queued a "Not Found" notification.
            CommandError::Workflow(WorkflowError::NotFound(_)) => {}
            other => output::error(other),
        }
    }

    /// Prints and clears notifications raised by every workflow.
    pub(crate) fn flush_notifications(&mut self) {
        let mut notices = self.session.income.take_notifications();
        notices.extend(self.session.expenses.take_notifications());
        notices.extend(self.session.appointments.take_notifications());
        for notice in notices {
            print_notification(&notice);
        }
    }

    /// Persists `config` and pushes the derived settings into the session.
    pub(crate) fn apply_config(&mut self, config: Config) -> CommandResult {
        let settings = config.workflow_settings(self.today())?;
        self.config_manager.save(&config)?;
        self.session.apply_settings(settings);
        self.config = config;
        Ok(())
    }
}

fn print_notification(notice: &Notification) {
    if notice.is_destructive() {
        output::warning(notice);
    } else {
        output::success(notice);
    }
}

/// `BIZDASH_TODAY=YYYY-MM-DD` pins the session date.
fn clock_from_env() -> Result<Box<dyn Clock>, CliError> {
    match env::var(TODAY_ENV) {
        Ok(raw) => match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
            Ok(date) => Ok(Box::new(FixedClock::new(date))),
            Err(_) => Err(CliError::Input(format!(
                "{TODAY_ENV} must be YYYY-MM-DD, got `{raw}`"
            ))),
        },
        Err(_) => Ok(Box::new(SystemClock)),
    }
}

/// Converts a 1-based row argument into an index into a list of `len` rows.
pub(crate) fn parse_row(arg: Option<&str>, len: usize) -> Result<usize, CommandError> {
    let raw =
        arg.ok_or_else(|| CommandError::InvalidArguments("a row number is required".into()))?;
    let row: usize = raw
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a row number")))?;
    if row == 0 || row > len {
        return Err(CommandError::InvalidArguments(format!(
            "row {row} is out of range (1-{len})"
        )));
    }
    Ok(row - 1)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a YYYY-MM-DD date")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_numbers_are_one_based_and_bounded() {
        assert_eq!(parse_row(Some("1"), 2).unwrap(), 0);
        assert!(parse_row(Some("0"), 2).is_err());
        assert!(parse_row(Some("3"), 2).is_err());
        assert!(parse_row(Some("x"), 2).is_err());
        assert!(parse_row(None, 2).is_err());
    }
}
