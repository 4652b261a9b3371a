use chrono::NaiveDate;
use colored::Colorize;

use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{CommandError, CommandResult, ShellContext};
use crate::cli::table::{Table, TableColumn};
use crate::domain::{ChartSeries, Tone};
use crate::engine::services::summary_service::DEFAULT_MONTHS;
use crate::engine::services::SummaryService;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "summary",
        "Show dashboard totals and the monthly revenue/expense series",
        "summary [<YYYY-MM>]",
        cmd_summary,
    )]
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let session = &context.session;
    let income = session.income.records();
    let expenses = session.expenses.records();
    let money = &session.income.settings().money;

    // Without an argument the chart ends at the latest recorded entry.
    let end = match args.first() {
        Some(raw) => parse_month(raw)?,
        None => income
            .iter()
            .chain(expenses)
            .map(|entry| entry.date)
            .max()
            .unwrap_or_else(|| context.today()),
    };

    output::section("Dashboard");
    let summary = session.summary();
    let rows: Vec<(&str, String)> = SummaryService::metrics(&summary)
        .into_iter()
        .map(|metric| {
            let descriptor = metric.key.descriptor();
            let mut value = toned(metric.tone, money.format(metric.value));
            if let Some(caption) = descriptor.caption {
                value.push_str(&format!("  ({caption})"));
            }
            (descriptor.label, value)
        })
        .collect();
    output::two_column(&rows);

    let series = SummaryService::monthly(income, expenses, end, DEFAULT_MONTHS)?;
    output::section("Revenue vs Expenses");
    let mut table = Table::new(vec![
        TableColumn::left("Month"),
        TableColumn::right(ChartSeries::Revenue.descriptor().label),
        TableColumn::right(ChartSeries::Expenses.descriptor().label),
    ]);
    for month in series {
        table.push(vec![
            format!("{} {}", month.month, month.year),
            money.format(month.revenue),
            money.format(month.expenses),
        ]);
    }
    output::info(table.render());
    Ok(())
}

fn parse_month(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a YYYY-MM month")))
}

fn toned(tone: Tone, text: String) -> String {
    match tone {
        Tone::Positive => text.green().to_string(),
        Tone::Negative => text.red().to_string(),
        Tone::Neutral => text,
    }
}
