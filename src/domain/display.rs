//! Presentation descriptors keyed by semantic values.
//!
//! The core never holds widget or icon types. Renderers resolve a key to one of
//! these descriptors and decide how to draw it.

use serde::{Deserialize, Serialize};

use crate::domain::common::RecordKind;

/// Headline figures shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKey {
    TotalRevenue,
    TotalExpenses,
    NetProfit,
}

impl MetricKey {
    pub const ALL: [MetricKey; 3] = [
        MetricKey::TotalRevenue,
        MetricKey::TotalExpenses,
        MetricKey::NetProfit,
    ];

    pub fn descriptor(self) -> MetricDescriptor {
        match self {
            MetricKey::TotalRevenue => MetricDescriptor {
                label: "Total Revenue",
                icon: "trending-up",
                caption: None,
            },
            MetricKey::TotalExpenses => MetricDescriptor {
                label: "Total Expenses",
                icon: "trending-down",
                caption: None,
            },
            MetricKey::NetProfit => MetricDescriptor {
                label: "Net Profit",
                icon: "line-chart",
                caption: Some("Calculated as Revenue - Expenses"),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub label: &'static str,
    pub icon: &'static str,
    pub caption: Option<&'static str>,
}

/// Colour intent for a metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Positive,
    Neutral,
    Negative,
}

/// Bars in the revenue/expense chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartSeries {
    Revenue,
    Expenses,
}

impl ChartSeries {
    pub const ALL: [ChartSeries; 2] = [ChartSeries::Revenue, ChartSeries::Expenses];

    pub fn descriptor(self) -> SeriesDescriptor {
        match self {
            ChartSeries::Revenue => SeriesDescriptor {
                key: "revenue",
                label: "Revenue",
                color: "chart-1",
            },
            ChartSeries::Expenses => SeriesDescriptor {
                key: "expenses",
                label: "Expenses",
                color: "chart-2",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

/// Copy used by list and form views for a record kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindDescriptor {
    pub label: &'static str,
    pub log_title: String,
    pub add_label: String,
    pub new_form_title: String,
    pub edit_form_title: String,
    pub empty_caption: String,
    pub delete_prompt: String,
}

impl RecordKind {
    pub fn descriptor(self) -> KindDescriptor {
        let label = self.label();
        let lower = label.to_lowercase();
        match self {
            RecordKind::Income | RecordKind::Expense => KindDescriptor {
                label,
                log_title: format!("{label} Log"),
                add_label: format!("Add New {label}"),
                new_form_title: format!("Add New {label} Entry"),
                edit_form_title: format!("Edit {label} Entry"),
                empty_caption: format!("No {lower} entries yet."),
                delete_prompt: format!(
                    "This action cannot be undone. This will permanently delete the {lower} entry."
                ),
            },
            RecordKind::Appointment => KindDescriptor {
                label,
                log_title: "Appointment Calendar".into(),
                add_label: "Create Appointment".into(),
                new_form_title: "Create New Appointment".into(),
                edit_form_title: "Edit Appointment".into(),
                empty_caption: "No appointments for this day.".into(),
                delete_prompt: String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expense_descriptor_uses_lowercase_in_sentences() {
        let descriptor = RecordKind::Expense.descriptor();
        assert_eq!(descriptor.log_title, "Expense Log");
        assert_eq!(descriptor.empty_caption, "No expense entries yet.");
        assert!(descriptor.delete_prompt.ends_with("delete the expense entry."));
    }

    #[test]
    fn every_metric_has_an_icon() {
        for key in MetricKey::ALL {
            assert!(!key.descriptor().icon.is_empty());
        }
    }
}
