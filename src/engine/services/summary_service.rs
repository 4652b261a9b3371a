use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::currency::month_label;
use crate::domain::{FinancialEntry, MetricKey, Tone};

use super::{ServiceError, ServiceResult};

pub const DEFAULT_MONTHS: usize = 6;

/// Headline totals across every income and expense entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub revenue: f64,
    pub expenses: f64,
    pub net_profit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetric {
    pub key: MetricKey,
    pub value: f64,
    pub tone: Tone,
}

/// One bar group of the revenue/expense chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyData {
    pub month: String,
    pub year: i32,
    pub revenue: f64,
    pub expenses: f64,
}

pub struct SummaryService;

impl SummaryService {
    pub fn totals(income: &[FinancialEntry], expenses: &[FinancialEntry]) -> FinancialSummary {
        let revenue = sum(income.iter());
        let expenses = sum(expenses.iter());
        FinancialSummary {
            revenue,
            expenses,
            net_profit: revenue - expenses,
        }
    }

    pub fn metrics(summary: &FinancialSummary) -> Vec<FinancialMetric> {
        MetricKey::ALL
            .into_iter()
            .map(|key| {
                let value = match key {
                    MetricKey::TotalRevenue => summary.revenue,
                    MetricKey::TotalExpenses => summary.expenses,
                    MetricKey::NetProfit => summary.net_profit,
                };
                FinancialMetric {
                    key,
                    value,
                    tone: tone_for(key, value),
                }
            })
            .collect()
    }

    /// Revenue and expenses per calendar month for the `months` months ending
    /// with the month containing `end`, oldest first.
    pub fn monthly(
        income: &[FinancialEntry],
        expenses: &[FinancialEntry],
        end: NaiveDate,
        months: usize,
    ) -> ServiceResult<Vec<MonthlyData>> {
        if months == 0 {
            return Err(ServiceError::Invalid(
                "monthly series needs at least one month".into(),
            ));
        }
        let end_index = month_index(end.year(), end.month());
        let start_index = end_index - (months as i64 - 1);
        Ok((start_index..=end_index)
            .map(|index| {
                let year = index.div_euclid(12) as i32;
                let month = index.rem_euclid(12) as u32 + 1;
                let in_month = |entry: &&FinancialEntry| {
                    entry.date.year() == year && entry.date.month() == month
                };
                MonthlyData {
                    month: month_label(month).to_string(),
                    year,
                    revenue: sum(income.iter().filter(in_month)),
                    expenses: sum(expenses.iter().filter(in_month)),
                }
            })
            .collect())
    }
}

fn sum<'a>(entries: impl Iterator<Item = &'a FinancialEntry>) -> f64 {
    entries.map(|entry| entry.amount).sum()
}

fn month_index(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

pub fn tone_for(key: MetricKey, value: f64) -> Tone {
    if value < 0.0 {
        Tone::Negative
    } else if key == MetricKey::NetProfit {
        Tone::Positive
    } else {
        Tone::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewEntry;
    use uuid::Uuid;

    fn entry(y: i32, m: u32, d: u32, amount: f64) -> FinancialEntry {
        FinancialEntry::from_new(
            Uuid::new_v4(),
            NewEntry {
                date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
                description: "Entry".into(),
                amount,
                category: "General".into(),
            },
        )
    }

    #[test]
    fn net_profit_tone_tracks_sign() {
        let loss = SummaryService::totals(&[entry(2024, 7, 1, 100.0)], &[entry(2024, 7, 2, 250.0)]);
        assert_eq!(loss.net_profit, -150.0);
        let metrics = SummaryService::metrics(&loss);
        assert_eq!(metrics[0].tone, Tone::Neutral);
        assert_eq!(metrics[2].tone, Tone::Negative);

        let even = SummaryService::totals(&[], &[]);
        assert_eq!(SummaryService::metrics(&even)[2].tone, Tone::Positive);
    }

    #[test]
    fn monthly_spans_year_boundary() {
        let income = vec![entry(2023, 12, 24, 300.0), entry(2024, 2, 1, 80.0)];
        let expenses = vec![entry(2024, 2, 14, 20.0), entry(2023, 6, 1, 999.0)];
        let end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

        let series = SummaryService::monthly(&income, &expenses, end, 3).unwrap();
        let labels: Vec<(String, i32)> = series.iter().map(|m| (m.month.clone(), m.year)).collect();
        assert_eq!(
            labels,
            vec![("Dec".into(), 2023), ("Jan".into(), 2024), ("Feb".into(), 2024)]
        );
        assert_eq!(series[0].revenue, 300.0);
        assert_eq!(series[1].revenue, 0.0);
        assert_eq!(series[2].expenses, 20.0);
    }

    #[test]
    fn monthly_rejects_empty_window() {
        let end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert!(SummaryService::monthly(&[], &[], end, 0).is_err());
    }
}
