//! Income and expense line items.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Dated, Identifiable};

/// A dated amount recorded against a category. Income and expenses share this shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: String,
}

impl FinancialEntry {
    pub fn from_new(id: Uuid, entry: NewEntry) -> Self {
        Self {
            id,
            date: entry.date,
            description: entry.description,
            amount: entry.amount,
            category: entry.category,
        }
    }

    /// Overwrites the fields present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: EntryPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
    }
}

impl Identifiable for FinancialEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Dated for FinancialEntry {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Validated entry fields, not yet assigned an identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewEntry {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: String,
}

/// Partial update for an existing entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
}

impl From<NewEntry> for EntryPatch {
    fn from(entry: NewEntry) -> Self {
        Self {
            date: Some(entry.date),
            description: Some(entry.description),
            amount: Some(entry.amount),
            category: Some(entry.category),
        }
    }
}

/// Raw form input for an entry, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub date: String,
    pub description: String,
    pub amount: String,
    pub category: String,
}

impl EntryDraft {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount: amount.into(),
            category: category.into(),
        }
    }

    /// Blank form with the date pre-selected.
    pub fn dated(date: NaiveDate) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }
}

impl From<&FinancialEntry> for EntryDraft {
    fn from(entry: &FinancialEntry) -> Self {
        Self {
            date: entry.date.format("%Y-%m-%d").to_string(),
            description: entry.description.clone(),
            // Display for f64 is the shortest text that parses back to the same value.
            amount: entry.amount.to_string(),
            category: entry.category.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FinancialEntry {
        FinancialEntry::from_new(
            Uuid::new_v4(),
            NewEntry {
                date: NaiveDate::from_ymd_opt(2024, 7, 5).unwrap(),
                description: "Software Subscription".into(),
                amount: 50.0,
                category: "Software".into(),
            },
        )
    }

    #[test]
    fn apply_only_touches_patched_fields() {
        let mut entry = sample();
        entry.apply(EntryPatch {
            amount: Some(65.5),
            ..EntryPatch::default()
        });
        assert_eq!(entry.amount, 65.5);
        assert_eq!(entry.description, "Software Subscription");
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 7, 5).unwrap());
    }

    #[test]
    fn draft_prefills_from_entry() {
        let mut entry = sample();
        let draft = EntryDraft::from(&entry);
        assert_eq!(draft.date, "2024-07-05");
        assert_eq!(draft.amount, "50");

        for (amount, text) in [(12.5, "12.5"), (12.345, "12.345"), (0.001, "0.001")] {
            entry.amount = amount;
            let prefilled = EntryDraft::from(&entry).amount;
            assert_eq!(prefilled, text);
            assert_eq!(prefilled.parse::<f64>().unwrap(), amount);
        }
    }
}
