//! `income` and `expenses` commands.

use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{parse_row, CommandError, CommandResult, ShellContext};
use crate::cli::table::{Table, TableColumn};
use crate::domain::{EntryDraft, FinancialEntry, RecordKind};
use crate::engine::Workflow;

const ACTIONS: &str = "<list|new|edit|submit|cancel|delete|confirm|dismiss|state>";
const SUBMIT_USAGE: &str = "submit <date> <description> <amount> <category>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "income",
            "Record and manage income entries",
            "income <list|new|edit|submit|cancel|delete|confirm|dismiss|state>",
            cmd_income,
        ),
        CommandEntry::new(
            "expenses",
            "Record and manage expense entries",
            "expenses <list|new|edit|submit|cancel|delete|confirm|dismiss|state>",
            cmd_expenses,
        ),
    ]
}

fn cmd_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    dispatch(context, RecordKind::Income, args)
}

fn cmd_expenses(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    dispatch(context, RecordKind::Expense, args)
}

fn command_name(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Income => "income",
        _ => "expenses",
    }
}

fn dispatch(context: &mut ShellContext, kind: RecordKind, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return handle_list(context, kind);
    };
    match action.to_lowercase().as_str() {
        "list" => handle_list(context, kind),
        "new" => handle_new(context, kind),
        "edit" => handle_edit(context, kind, rest),
        "submit" => handle_submit(context, kind, rest),
        "cancel" => {
            entry_log(context, kind)?.cancel()?;
            output::info("Form closed without saving.");
            Ok(())
        }
        "delete" => handle_delete(context, kind, rest),
        "confirm" => {
            entry_log(context, kind)?.confirm_delete()?;
            Ok(())
        }
        "dismiss" => {
            entry_log(context, kind)?.dismiss_delete()?;
            output::info("Deletion cancelled.");
            Ok(())
        }
        "state" => handle_state(context, kind),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown {} subcommand `{other}`, expected {ACTIONS}",
            command_name(kind)
        ))),
    }
}

fn entry_log(
    context: &mut ShellContext,
    kind: RecordKind,
) -> Result<&mut Workflow<FinancialEntry>, CommandError> {
    context
        .session
        .entries_mut(kind)
        .ok_or_else(|| CommandError::InvalidArguments(format!("{kind} has no entry log")))
}

fn handle_list(context: &mut ShellContext, kind: RecordKind) -> CommandResult {
    let workflow = entry_log(context, kind)?;
    let descriptor = kind.descriptor();
    output::section(&descriptor.log_title);
    if workflow.records().is_empty() {
        output::info(&descriptor.empty_caption);
        return Ok(());
    }

    let money = &workflow.settings().money;
    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Date"),
        TableColumn::left("Description").max(40),
        TableColumn::left("Category").max(24),
        TableColumn::right("Amount"),
    ]);
    for (index, entry) in workflow.records().iter().enumerate() {
        table.push(vec![
            (index + 1).to_string(),
            money.format_date(entry.date),
            entry.description.clone(),
            entry.category.clone(),
            money.format(entry.amount),
        ]);
    }
    output::info(table.render());
    Ok(())
}

fn handle_new(context: &mut ShellContext, kind: RecordKind) -> CommandResult {
    let draft = entry_log(context, kind)?.open_new()?.clone();
    output::section(kind.descriptor().new_form_title);
    output::info(format!("Date: {}", draft.date));
    output::hint(format!("Use `{} {SUBMIT_USAGE}` to save.", command_name(kind)));
    Ok(())
}

fn handle_edit(context: &mut ShellContext, kind: RecordKind, args: &[&str]) -> CommandResult {
    let workflow = entry_log(context, kind)?;
    let index = parse_row(args.first().copied(), workflow.records().len())?;
    let id = workflow.records()[index].id;
    let draft = workflow.open_edit(id)?.clone();

    output::section(kind.descriptor().edit_form_title);
    print_draft(&draft);
    output::hint(format!("Use `{} {SUBMIT_USAGE}` to save.", command_name(kind)));
    Ok(())
}

fn handle_submit(context: &mut ShellContext, kind: RecordKind, args: &[&str]) -> CommandResult {
    let [date, description, amount, category] = args else {
        return Err(CommandError::InvalidArguments(format!(
            "usage: {} {SUBMIT_USAGE}",
            command_name(kind)
        )));
    };
    let draft = EntryDraft::new(*date, *description, *amount, *category);
    entry_log(context, kind)?.submit(draft)?;
    Ok(())
}

fn handle_delete(context: &mut ShellContext, kind: RecordKind, args: &[&str]) -> CommandResult {
    let workflow = entry_log(context, kind)?;
    let index = parse_row(args.first().copied(), workflow.records().len())?;
    let id = workflow.records()[index].id;
    workflow.request_delete(id)?;

    let subject = workflow
        .pending_delete()
        .map(|entry| entry.description.clone())
        .unwrap_or_default();
    output::warning(format!(
        "Delete \"{subject}\"? {}",
        kind.descriptor().delete_prompt
    ));
    let name = command_name(kind);
    output::hint(format!("Use `{name} confirm` or `{name} dismiss`."));
    Ok(())
}

fn handle_state(context: &mut ShellContext, kind: RecordKind) -> CommandResult {
    let workflow = entry_log(context, kind)?;
    output::info(format!("{kind} workflow is {}.", workflow.state()));
    if let Some(form) = workflow.form() {
        print_draft(&form.draft);
        for (field, message) in form.errors.iter() {
            output::error(format!("{field}: {message}"));
        }
    }
    Ok(())
}

fn print_draft(draft: &EntryDraft) {
    output::two_column(&[
        ("Date", draft.date.clone()),
        ("Description", draft.description.clone()),
        ("Amount", draft.amount.clone()),
        ("Category", draft.category.clone()),
    ]);
}
