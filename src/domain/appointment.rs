//! Calendar appointments.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Dated, Identifiable};

pub const TIME_FORMAT: &str = "%H:%M";

/// A titled time slot on a calendar day. Overlapping slots are allowed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    #[serde(with = "hh_mm")]
    pub start_time: NaiveTime,
    #[serde(with = "hh_mm")]
    pub end_time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Appointment {
    pub fn from_new(id: Uuid, appointment: NewAppointment) -> Self {
        Self {
            id,
            title: appointment.title,
            date: appointment.date,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            description: appointment.description,
        }
    }

    /// "10:00 - 11:00"
    pub fn time_range(&self) -> String {
        format!(
            "{} - {}",
            self.start_time.format(TIME_FORMAT),
            self.end_time.format(TIME_FORMAT)
        )
    }
}

impl Identifiable for Appointment {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Dated for Appointment {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewAppointment {
    pub title: String,
    pub date: NaiveDate,
    #[serde(with = "hh_mm")]
    pub start_time: NaiveTime,
    #[serde(with = "hh_mm")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub description: Option<String>,
}

/// Raw dialog input for an appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
}

impl AppointmentDraft {
    pub fn new(
        title: impl Into<String>,
        date: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Blank dialog for `date` with the given default slot.
    pub fn blank(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self::new(
            "",
            date.format("%Y-%m-%d").to_string(),
            start.format(TIME_FORMAT).to_string(),
            end.format(TIME_FORMAT).to_string(),
        )
    }
}

/// Serde adapter storing a `NaiveTime` as a 24-hour `HH:MM` string.
pub mod hh_mm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::TIME_FORMAT;

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, TIME_FORMAT).map_err(de::Error::custom)
    }
}
