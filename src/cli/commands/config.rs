use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{CommandError, CommandResult, ShellContext};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => show(context),
        ["set", key, value] => {
            let mut next = context.config.clone();
            next.set(key, value)?;
            context.apply_config(next)?;
            output::success(format!("{key} set to {value}."));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: config [show|set <key> <value>]".into(),
        )),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    let mut rows = context.config.entries();
    rows.push(("file", context.config_manager.path().display().to_string()));
    output::two_column(&rows);
    Ok(())
}
