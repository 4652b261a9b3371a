//! Field-level validation for entry and appointment forms.
//!
//! Validators are pure: they take the raw text a user typed and either return
//! the typed record fields or a [`FieldErrors`] map describing every field that
//! failed. Nothing here touches a store.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::appointment::{AppointmentDraft, NewAppointment, TIME_FORMAT};
use crate::domain::entry::{EntryDraft, NewEntry};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Form fields that can carry validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Date,
    Description,
    Amount,
    Category,
    Title,
    StartTime,
    EndTime,
}

impl Field {
    pub fn key(self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Description => "description",
            Field::Amount => "amount",
            Field::Category => "category",
            Field::Title => "title",
            Field::StartTime => "startTime",
            Field::EndTime => "endTime",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Validation messages keyed by field, in declaration order of [`Field`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    errors: BTreeMap<Field, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with at least one message.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn messages(&self, field: Field) -> &[String] {
        self.errors.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, field: Field) -> Option<&str> {
        self.messages(field).first().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.errors
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| (*field, m.as_str())))
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Inclusive bounds on trimmed text length, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthRule {
    pub min: usize,
    pub max: usize,
}

/// Constraints applied to entry forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRules {
    pub description: LengthRule,
    pub category: LengthRule,
    pub earliest_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_date: Option<NaiveDate>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            description: LengthRule { min: 2, max: 100 },
            category: LengthRule { min: 2, max: 50 },
            earliest_date: default_earliest_date(),
            latest_date: None,
        }
    }
}

pub fn default_earliest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Validates an income or expense form.
pub fn validate_entry(
    draft: &EntryDraft,
    rules: &ValidationRules,
) -> Result<NewEntry, FieldErrors> {
    let mut errors = FieldErrors::new();

    let date = check_date(&draft.date, rules, &mut errors);
    let description = check_length(
        &draft.description,
        Field::Description,
        "Description",
        rules.description,
        &mut errors,
    );
    let amount = check_amount(&draft.amount, &mut errors);
    let category = check_length(
        &draft.category,
        Field::Category,
        "Category",
        rules.category,
        &mut errors,
    );

    errors.into_result(|| NewEntry {
        date: date.unwrap_or_default(),
        description,
        amount: amount.unwrap_or_default(),
        category,
    })
}

/// Validates an appointment dialog. Only presence and format are checked;
/// overlapping or inverted time ranges are accepted.
pub fn validate_appointment(draft: &AppointmentDraft) -> Result<NewAppointment, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = draft.title.trim();
    if title.is_empty() {
        errors.push(Field::Title, "Title is required.");
    }

    let date = match draft.date.trim() {
        "" => {
            errors.push(Field::Date, "A date is required.");
            None
        }
        raw => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(Field::Date, "Use YYYY-MM-DD format.");
                None
            }
        },
    };

    let start_time = check_time(&draft.start_time, Field::StartTime, "Start time", &mut errors);
    let end_time = check_time(&draft.end_time, Field::EndTime, "End time", &mut errors);

    let description = draft.description.trim();
    errors.into_result(|| NewAppointment {
        title: title.to_string(),
        date: date.unwrap_or_default(),
        start_time: start_time.unwrap_or_default(),
        end_time: end_time.unwrap_or_default(),
        description: if description.is_empty() {
            None
        } else {
            Some(description.to_string())
        },
    })
}

fn check_length(
    input: &str,
    field: Field,
    label: &str,
    rule: LengthRule,
    errors: &mut FieldErrors,
) -> String {
    let trimmed = input.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        errors.push(field, format!("{label} is required."));
    } else if len < rule.min {
        errors.push(
            field,
            format!("{label} must be at least {} characters.", rule.min),
        );
    } else if len > rule.max {
        errors.push(
            field,
            format!("{label} must be at most {} characters.", rule.max),
        );
    }
    trimmed.to_string()
}

fn check_amount(input: &str, errors: &mut FieldErrors) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        errors.push(Field::Amount, "Amount is required.");
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if !value.is_finite() => {
            errors.push(Field::Amount, "Amount must be a finite number.");
            None
        }
        Ok(value) if value <= 0.0 => {
            errors.push(Field::Amount, "Amount must be positive.");
            None
        }
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(Field::Amount, "Amount must be a number.");
            None
        }
    }
}

fn check_date(input: &str, rules: &ValidationRules, errors: &mut FieldErrors) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        errors.push(Field::Date, "A date is required.");
        return None;
    }
    let date = match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        Ok(date) => date,
        Err(_) => {
            errors.push(Field::Date, "Use YYYY-MM-DD format.");
            return None;
        }
    };
    if date < rules.earliest_date {
        errors.push(
            Field::Date,
            format!(
                "Date must be on or after {}.",
                rules.earliest_date.format(DATE_FORMAT)
            ),
        );
        return None;
    }
    if let Some(latest) = rules.latest_date {
        if date > latest {
            errors.push(
                Field::Date,
                format!("Date cannot be after {}.", latest.format(DATE_FORMAT)),
            );
            return None;
        }
    }
    Some(date)
}

fn check_time(
    input: &str,
    field: Field,
    label: &str,
    errors: &mut FieldErrors,
) -> Option<NaiveTime> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        errors.push(field, format!("{label} is required."));
        return None;
    }
    match NaiveTime::parse_from_str(trimmed, TIME_FORMAT) {
        Ok(time) => Some(time),
        Err(_) => {
            errors.push(field, "Use 24-hour HH:MM format.");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(amount: &str) -> EntryDraft {
        EntryDraft::new("2024-07-05", "Software Subscription", amount, "Software")
    }

    #[test]
    fn accepts_well_formed_entry() {
        let entry = validate_entry(&draft("50"), &ValidationRules::default()).unwrap();
        assert_eq!(entry.amount, 50.0);
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 7, 5).unwrap());
    }

    #[test]
    fn rejects_non_positive_and_non_numeric_amounts() {
        let rules = ValidationRules::default();
        for raw in ["-5", "0", "abc", "", "inf", "NaN"] {
            let errors = validate_entry(&draft(raw), &rules).unwrap_err();
            assert!(errors.contains(Field::Amount), "{raw:?} should be rejected");
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn trims_before_measuring_length() {
        let rules = ValidationRules::default();
        let candidate = EntryDraft::new("2024-07-05", "  a  ", "10", " Rent ");
        let errors = validate_entry(&candidate, &rules).unwrap_err();
        assert_eq!(
            errors.first(Field::Description),
            Some("Description must be at least 2 characters.")
        );
        assert!(!errors.contains(Field::Category));

        let long = "x".repeat(51);
        let candidate = EntryDraft::new("2024-07-05", "Office Rent", "10", long);
        let errors = validate_entry(&candidate, &rules).unwrap_err();
        assert_eq!(
            errors.first(Field::Category),
            Some("Category must be at most 50 characters.")
        );
    }

    #[test]
    fn reports_every_failing_field() {
        let candidate = EntryDraft::new("2024-02-30", "", "-1", "");
        let errors = validate_entry(&candidate, &ValidationRules::default()).unwrap_err();
        let fields: Vec<Field> = errors.fields().collect();
        assert_eq!(
            fields,
            vec![Field::Date, Field::Description, Field::Amount, Field::Category]
        );
    }

    #[test]
    fn enforces_date_window() {
        let rules = ValidationRules {
            latest_date: NaiveDate::from_ymd_opt(2024, 7, 10),
            ..ValidationRules::default()
        };
        let future = EntryDraft::new("2024-07-11", "Office Rent", "800", "Rent");
        assert!(validate_entry(&future, &rules).unwrap_err().contains(Field::Date));

        let ancient = EntryDraft::new("1899-12-31", "Office Rent", "800", "Rent");
        assert!(validate_entry(&ancient, &rules).unwrap_err().contains(Field::Date));
    }

    #[test]
    fn appointment_requires_core_fields() {
        let errors = validate_appointment(&AppointmentDraft::new(" ", "", "9am", "")).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.first(Field::StartTime), Some("Use 24-hour HH:MM format."));
    }

    #[test]
    fn appointment_allows_inverted_range_and_blank_description() {
        let draft = AppointmentDraft::new("Dentist", "2024-07-12", "10:00", "09:30")
            .with_description("   ");
        let appointment = validate_appointment(&draft).unwrap();
        assert_eq!(appointment.description, None);
        assert!(appointment.end_time < appointment.start_time);
    }
}
