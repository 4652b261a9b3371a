//! `appointments` command: calendar day view and the create dialog.

use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{parse_date, CommandError, CommandResult, ShellContext};
use crate::cli::table::{Table, TableColumn};
use crate::currency::{format_date_style, DateFormatStyle};
use crate::domain::{AppointmentDraft, RecordKind};

const SUBMIT_USAGE: &str = "appointments submit <title> <date> <start> <end> [description]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "appointments",
        "Browse the calendar and schedule appointments",
        "appointments <day [<date>]|booked|new|submit|cancel|list|state>",
        cmd_appointments,
    )]
}

fn cmd_appointments(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return handle_day(context, &[]);
    };
    match action.to_lowercase().as_str() {
        "day" => handle_day(context, rest),
        "booked" => handle_booked(context),
        "new" => handle_new(context),
        "submit" => handle_submit(context, rest),
        "cancel" => {
            context.session.appointments.cancel()?;
            output::info("Dialog closed without saving.");
            Ok(())
        }
        "list" => handle_list(context),
        "state" => {
            let workflow = &context.session.appointments;
            output::info(format!("Appointment workflow is {}.", workflow.state()));
            if let Some(form) = workflow.form() {
                print_draft(&form.draft);
            }
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown appointments subcommand `{other}`"
        ))),
    }
}

fn handle_day(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(raw) = args.first() {
        let date = parse_date(raw)?;
        context.session.appointments.select_date(date);
    }
    let workflow = &context.session.appointments;
    let date = workflow.selected_date();
    output::section(format!(
        "Appointments for {}",
        format_date_style(DateFormatStyle::Long, date)
    ));

    let day = workflow.day_view();
    if day.is_empty() {
        output::info(&RecordKind::Appointment.descriptor().empty_caption);
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Time"),
        TableColumn::left("Title").max(40),
        TableColumn::left("Description").max(40),
    ]);
    for appointment in day {
        table.push(vec![
            appointment.time_range(),
            appointment.title.clone(),
            appointment.description.clone().unwrap_or_default(),
        ]);
    }
    output::info(table.render());
    Ok(())
}

fn handle_booked(context: &mut ShellContext) -> CommandResult {
    let workflow = &context.session.appointments;
    output::section("Booked Days");
    let booked = workflow.booked_dates();
    if booked.is_empty() {
        output::info("No booked days.");
    }
    for date in booked {
        let count = workflow.store().query_by_date(date).len();
        output::info(format!(
            "{}  ({count})",
            workflow.settings().money.format_date(date)
        ));
    }
    Ok(())
}

fn handle_new(context: &mut ShellContext) -> CommandResult {
    let draft = context.session.appointments.open_new()?.clone();
    output::section(RecordKind::Appointment.descriptor().new_form_title);
    print_draft(&draft);
    output::hint(format!("Use `{SUBMIT_USAGE}` to save."));
    Ok(())
}

fn handle_submit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (title, date, start, end, description) = match args {
        [title, date, start, end] => (title, date, start, end, ""),
        [title, date, start, end, description] => (title, date, start, end, *description),
        _ => {
            return Err(CommandError::InvalidArguments(format!(
                "usage: {SUBMIT_USAGE}"
            )))
        }
    };
    let draft = AppointmentDraft::new(*title, *date, *start, *end).with_description(description);
    context.session.appointments.submit(draft)?;
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let workflow = &context.session.appointments;
    output::section(RecordKind::Appointment.descriptor().log_title);
    if workflow.records().is_empty() {
        output::info("No appointments scheduled.");
        return Ok(());
    }
    let money = &workflow.settings().money;
    let mut table = Table::new(vec![
        TableColumn::left("Date"),
        TableColumn::left("Time"),
        TableColumn::left("Title").max(40),
    ]);
    for appointment in workflow.records() {
        table.push(vec![
            money.format_date(appointment.date),
            appointment.time_range(),
            appointment.title.clone(),
        ]);
    }
    output::info(table.render());
    Ok(())
}

fn print_draft(draft: &AppointmentDraft) {
    output::two_column(&[
        ("Title", draft.title.clone()),
        ("Date", draft.date.clone()),
        ("Start", draft.start_time.clone()),
        ("End", draft.end_time.clone()),
        ("Description", draft.description.clone()),
    ]);
}
