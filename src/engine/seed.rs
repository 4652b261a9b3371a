//! Mock datasets loaded into fresh sessions.

use chrono::{Days, NaiveDate, NaiveTime};

use crate::domain::{NewAppointment, NewEntry};

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

fn entry(date: NaiveDate, description: &str, amount: f64, category: &str) -> NewEntry {
    NewEntry {
        date,
        description: description.into(),
        amount,
        category: category.into(),
    }
}

pub fn income() -> Vec<NewEntry> {
    vec![
        entry(day(2024, 7, 1), "Consulting Gig", 1200.0, "Services"),
        entry(
            day(2024, 7, 15),
            "Online Course Sales",
            450.0,
            "Digital Products",
        ),
    ]
}

pub fn expenses() -> Vec<NewEntry> {
    vec![
        entry(day(2024, 7, 5), "Software Subscription", 50.0, "Software"),
        entry(day(2024, 7, 20), "Office Rent", 800.0, "Rent"),
    ]
}

/// Appointments are scheduled relative to `today` so the calendar opens on a busy day.
pub fn appointments(today: NaiveDate) -> Vec<NewAppointment> {
    let offset = |days: u64| today.checked_add_days(Days::new(days)).unwrap_or(today);
    let slot = |title: &str, date, start, end, description: Option<&str>| NewAppointment {
        title: title.into(),
        date,
        start_time: start,
        end_time: end,
        description: description.map(str::to_string),
    };
    vec![
        slot(
            "Team Meeting",
            today,
            at(10, 0),
            at(11, 0),
            Some("Weekly sync-up"),
        ),
        slot(
            "Client Call - Acme Corp",
            today,
            at(14, 0),
            at(15, 0),
            Some("Project discussion"),
        ),
        slot("Dentist Appointment", offset(2), at(9, 0), at(9, 30), None),
        slot(
            "Project Deadline Presentation",
            offset(5),
            at(11, 0),
            at(12, 30),
            Some("Final review"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appointments_follow_today() {
        let today = day(2024, 12, 30);
        let dates: Vec<NaiveDate> = appointments(today).iter().map(|a| a.date).collect();
        assert_eq!(
            dates,
            vec![today, today, day(2025, 1, 1), day(2025, 1, 4)]
        );
    }
}
