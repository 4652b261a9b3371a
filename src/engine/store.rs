//! In-memory ordered record collections.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    Appointment, Dated, EntryPatch, FinancialEntry, Identifiable, NewAppointment, NewEntry,
    RecordKind,
};
use crate::errors::StoreError;

/// Where a freshly added record lands relative to records that compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    BeforeEqual,
    AfterEqual,
}

/// A record type a [`RecordStore`] can own.
pub trait Record: Identifiable + Dated + Clone + fmt::Debug {
    /// Validated fields used to create a record.
    type Fields;

    const PLACEMENT: Placement;

    fn from_fields(id: Uuid, fields: Self::Fields) -> Self;

    /// Collection order; the store keeps its list sorted by this at all times.
    fn ordering(a: &Self, b: &Self) -> Ordering;
}

/// A record that can be changed in place. Only these stores offer
/// [`RecordStore::update`]; appointments are add and remove only.
///
/// ```compile_fail
/// use bizdash_core::domain::common::uuid::Uuid;
/// use bizdash_core::domain::{Appointment, RecordKind};
/// use bizdash_core::engine::RecordStore;
///
/// let mut calendar: RecordStore<Appointment> = RecordStore::new(RecordKind::Appointment);
/// calendar.update(Uuid::nil(), ());
/// ```
pub trait Patchable: Record {
    type Patch;

    fn apply_patch(&mut self, patch: Self::Patch);
}

impl Record for FinancialEntry {
    type Fields = NewEntry;

    const PLACEMENT: Placement = Placement::BeforeEqual;

    fn from_fields(id: Uuid, fields: NewEntry) -> Self {
        FinancialEntry::from_new(id, fields)
    }

    // Most recent first.
    fn ordering(a: &Self, b: &Self) -> Ordering {
        b.date.cmp(&a.date)
    }
}

impl Patchable for FinancialEntry {
    type Patch = EntryPatch;

    fn apply_patch(&mut self, patch: EntryPatch) {
        self.apply(patch);
    }
}

impl Record for Appointment {
    type Fields = NewAppointment;

    const PLACEMENT: Placement = Placement::AfterEqual;

    fn from_fields(id: Uuid, fields: NewAppointment) -> Self {
        Appointment::from_new(id, fields)
    }

    fn ordering(a: &Self, b: &Self) -> Ordering {
        a.date
            .cmp(&b.date)
            .then_with(|| a.start_time.cmp(&b.start_time))
    }
}

/// Canonical list for one record kind.
///
/// The list is sorted by [`Record::ordering`] after every mutation, so
/// [`RecordStore::list`] is always a valid snapshot to render.
#[derive(Debug, Clone)]
pub struct RecordStore<R: Record> {
    kind: RecordKind,
    records: Vec<R>,
}

impl<R: Record> RecordStore<R> {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    /// Builds a store and loads `seed` through [`RecordStore::add`].
    pub fn seeded(kind: RecordKind, seed: impl IntoIterator<Item = R::Fields>) -> Self {
        let mut store = Self::new(kind);
        for fields in seed {
            store.add(fields);
        }
        debug!(kind = %kind, count = store.len(), "seeded record store");
        store
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn list(&self) -> &[R] {
        &self.records
    }

    pub fn snapshot(&self) -> Vec<R> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    /// Records filed on `date`, in collection order.
    pub fn on_date(&self, date: NaiveDate) -> Vec<&R> {
        self.records
            .iter()
            .filter(|record| record.date() == date)
            .collect()
    }

    /// Stores a new record under a fresh identifier and returns it.
    pub fn add(&mut self, fields: R::Fields) -> &R {
        let record = R::from_fields(Uuid::new_v4(), fields);
        let slot = self.slot_for(&record);
        debug!(kind = %self.kind, id = %record.id(), slot, "record added");
        self.records.insert(slot, record);
        &self.records[slot]
    }

    /// Removes and returns the record identified by `id`.
    pub fn remove(&mut self, id: Uuid) -> Result<R, StoreError> {
        let index = self.index_of(id)?;
        debug!(kind = %self.kind, %id, "record removed");
        Ok(self.records.remove(index))
    }

    fn index_of(&self, id: Uuid) -> Result<usize, StoreError> {
        self.records
            .iter()
            .position(|record| record.id() == id)
            .ok_or(StoreError::NotFound {
                kind: self.kind,
                id,
            })
    }

    // Equivalent to inserting at the front/back and stable-sorting the full list,
    // given the list is already sorted.
    fn slot_for(&self, record: &R) -> usize {
        match R::PLACEMENT {
            Placement::BeforeEqual => self
                .records
                .partition_point(|existing| R::ordering(existing, record) == Ordering::Less),
            Placement::AfterEqual => self
                .records
                .partition_point(|existing| R::ordering(existing, record) != Ordering::Greater),
        }
    }

    fn fits_at(&self, index: usize, record: &R) -> bool {
        let after_prev = index == 0
            || R::ordering(&self.records[index - 1], record) != Ordering::Greater;
        let before_next = self
            .records
            .get(index)
            .map_or(true, |next| R::ordering(record, next) != Ordering::Greater);
        after_prev && before_next
    }
}

impl<R: Patchable> RecordStore<R> {
    /// Applies `patch` to the record identified by `id`.
    pub fn update(&mut self, id: Uuid, patch: R::Patch) -> Result<&R, StoreError> {
        let index = self.index_of(id)?;
        let mut record = self.records.remove(index);
        record.apply_patch(patch);

        let slot = if self.fits_at(index, &record) {
            index
        } else {
            self.slot_for(&record)
        };
        debug!(kind = %self.kind, %id, from = index, to = slot, "record updated");
        self.records.insert(slot, record);
        Ok(&self.records[slot])
    }
}

impl RecordStore<Appointment> {
    /// Appointments on the calendar day `date`, earliest start first.
    pub fn query_by_date(&self, date: NaiveDate) -> Vec<&Appointment> {
        let mut day = self.on_date(date);
        day.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        day
    }

    /// Distinct days holding at least one appointment, ascending.
    pub fn booked_dates(&self) -> Vec<NaiveDate> {
        self.records
            .iter()
            .map(|appointment| appointment.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
