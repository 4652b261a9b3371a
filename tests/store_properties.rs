mod common;

use bizdash_core::domain::{
    Appointment, EntryPatch, FinancialEntry, NewAppointment, NewEntry, RecordKind,
};
use bizdash_core::engine::RecordStore;
use bizdash_core::errors::StoreError;
use chrono::{Days, NaiveTime};
use common::date;

fn entry(day_offset: u64, label: &str) -> NewEntry {
    NewEntry {
        date: date(2024, 1, 1) + Days::new(day_offset),
        description: label.to_string(),
        amount: 25.0,
        category: "General".into(),
    }
}

fn appointment(day_offset: u64, hour: u32, label: &str) -> NewAppointment {
    NewAppointment {
        title: label.to_string(),
        date: date(2024, 7, 1) + Days::new(day_offset),
        start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(hour, 30, 0).unwrap(),
        description: None,
    }
}

// Small LCG so the insertion order is scrambled but reproducible.
fn offsets(count: usize, modulo: u64) -> Vec<u64> {
    let mut state: u64 = 0x2545_f491;
    (0..count)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 33) % modulo
        })
        .collect()
}

#[test]
fn entry_list_is_sorted_after_every_add() {
    let mut store: RecordStore<FinancialEntry> = RecordStore::new(RecordKind::Income);
    for (idx, offset) in offsets(200, 40).into_iter().enumerate() {
        let id = store.add(entry(offset, &format!("e{idx}"))).id;
        let list = store.list();
        assert!(list.windows(2).all(|pair| pair[0].date >= pair[1].date));

        // The newest record leads its date group.
        let added = list.iter().find(|e| e.id == id).unwrap();
        let first_of_day = list.iter().find(|e| e.date == added.date).unwrap();
        assert_eq!(first_of_day.id, id);
    }
}

#[test]
fn appointment_list_is_sorted_after_every_add() {
    let mut store: RecordStore<Appointment> = RecordStore::new(RecordKind::Appointment);
    for (idx, offset) in offsets(150, 10).into_iter().enumerate() {
        let hour = 8 + (offset as u32 % 4);
        let id = store.add(appointment(offset, hour, &format!("a{idx}"))).id;
        let list = store.list();
        assert!(list
            .windows(2)
            .all(|pair| (pair[0].date, pair[0].start_time) <= (pair[1].date, pair[1].start_time)));

        // The newest record trails records with the same day and start.
        let added = list.iter().position(|a| a.id == id).unwrap();
        if let Some(next) = list.get(added + 1) {
            assert!((next.date, next.start_time) > (list[added].date, list[added].start_time));
        }
    }
}

#[test]
fn add_then_remove_restores_snapshot() {
    let mut store: RecordStore<FinancialEntry> = RecordStore::new(RecordKind::Expense);
    for offset in offsets(20, 15) {
        store.add(entry(offset, "seed"));
    }
    let before = store.snapshot();

    let id = store.add(entry(7, "transient")).id;
    assert_eq!(store.len(), before.len() + 1);
    let removed = store.remove(id).unwrap();
    assert_eq!(removed.description, "transient");
    assert_eq!(store.snapshot(), before);

    let err = store.remove(id).unwrap_err();
    assert_eq!(
        err,
        StoreError::NotFound {
            kind: RecordKind::Expense,
            id
        }
    );
    assert_eq!(store.snapshot(), before);
}

#[test]
fn update_on_missing_id_leaves_list_unchanged() {
    let mut store: RecordStore<FinancialEntry> =
        RecordStore::seeded(RecordKind::Income, vec![entry(1, "a"), entry(2, "b")]);
    let before = store.snapshot();
    let patch = EntryPatch {
        amount: Some(99.0),
        ..EntryPatch::default()
    };
    assert!(store.update(uuid::Uuid::new_v4(), patch).is_err());
    assert_eq!(store.snapshot(), before);
}

#[test]
fn update_replaces_only_patched_fields_and_resorts() {
    let mut store: RecordStore<FinancialEntry> = RecordStore::new(RecordKind::Expense);
    let early = store.add(entry(0, "early")).id;
    store.add(entry(10, "late"));

    let patch = EntryPatch {
        date: Some(date(2024, 2, 1)),
        ..EntryPatch::default()
    };
    let updated = store.update(early, patch).unwrap();
    assert_eq!(updated.description, "early");
    assert_eq!(updated.amount, 25.0);
    assert_eq!(store.list()[0].id, early);
}

#[test]
fn seeded_expenses_list_most_recent_first() {
    let store: RecordStore<FinancialEntry> = RecordStore::seeded(
        RecordKind::Expense,
        vec![
            NewEntry {
                date: date(2024, 7, 5),
                description: "Software Subscription".into(),
                amount: 50.0,
                category: "Software".into(),
            },
            NewEntry {
                date: date(2024, 7, 20),
                description: "Office Rent".into(),
                amount: 800.0,
                category: "Rent".into(),
            },
        ],
    );
    assert_eq!(store.list()[0].date, date(2024, 7, 20));
    assert_eq!(store.list()[1].date, date(2024, 7, 5));
}

#[test]
fn query_by_date_returns_exactly_the_added_appointment() {
    let mut store: RecordStore<Appointment> = RecordStore::new(RecordKind::Appointment);
    store.add(appointment(0, 10, "Other day"));
    let dentist = NewAppointment {
        title: "Dentist".into(),
        date: date(2024, 7, 12),
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        description: None,
    };
    let id = store.add(dentist).id;

    let day = store.query_by_date(date(2024, 7, 12));
    assert_eq!(day.len(), 1);
    assert_eq!(day[0].id, id);
    assert_eq!(day[0].title, "Dentist");
}
