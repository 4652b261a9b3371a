//! Create/edit/delete flow for one record kind.
//!
//! A [`Workflow`] owns the [`RecordStore`] for its kind and is the only writer
//! to it. Every intent from the presentation layer goes through one of the
//! methods below; each either completes a transition (store mutated, sort order
//! restored, listeners told) or returns an error and leaves everything as it was.
//!
//! ```text
//! Idle --open_new--> Creating --submit--> Idle (add)
//! Idle --open_edit--> Editing --submit--> Idle (update)
//! Creating|Editing --cancel--> Idle
//! Idle --request_delete--> ConfirmingDelete --confirm_delete--> Idle (remove)
//!                                          --dismiss_delete--> Idle
//! ```
//!
//! Edit and delete intents are only available for record types that implement
//! [`Editable`].

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::currency::{format_date_style, DateFormatStyle, MoneyFormat};
use crate::domain::{
    validate_appointment, validate_entry, Appointment, AppointmentDraft, EntryDraft, FieldErrors,
    FinancialEntry, Identifiable, NewEntry, RecordKind, ValidationRules,
};
use crate::engine::events::{Listener, ListenerId, Listeners, Notification, WorkflowEvent};
use crate::engine::store::{Patchable, Record, RecordStore};
use crate::errors::{StoreError, WorkflowError};

/// Current mode of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Creating,
    Editing(Uuid),
    ConfirmingDelete(Uuid),
}

impl WorkflowState {
    pub fn is_form_open(&self) -> bool {
        matches!(self, WorkflowState::Creating | WorkflowState::Editing(_))
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowState::Idle => write!(f, "idle"),
            WorkflowState::Creating => write!(f, "creating a record"),
            WorkflowState::Editing(id) => write!(f, "editing {id}"),
            WorkflowState::ConfirmingDelete(id) => write!(f, "confirming deletion of {id}"),
        }
    }
}

/// Intents a presentation layer can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    OpenNew,
    OpenEdit,
    Submit,
    Cancel,
    RequestDelete,
    ConfirmDelete,
    DismissDelete,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Intent::OpenNew => "open a new form",
            Intent::OpenEdit => "open an edit form",
            Intent::Submit => "submit a form",
            Intent::Cancel => "cancel a form",
            Intent::RequestDelete => "request a deletion",
            Intent::ConfirmDelete => "confirm a deletion",
            Intent::DismissDelete => "dismiss a deletion",
        };
        f.write_str(text)
    }
}

/// Values forms need beyond the draft itself.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSettings {
    pub rules: ValidationRules,
    pub money: MoneyFormat,
    pub default_start: NaiveTime,
    pub default_end: NaiveTime,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            rules: ValidationRules::default(),
            money: MoneyFormat::default(),
            default_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            default_end: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
        }
    }
}

/// A record type that can be created through a form.
pub trait FormRecord: Record {
    type Draft: Clone + fmt::Debug + PartialEq;

    fn validate(
        draft: &Self::Draft,
        settings: &WorkflowSettings,
    ) -> Result<Self::Fields, FieldErrors>;

    fn blank_draft(date: NaiveDate, settings: &WorkflowSettings) -> Self::Draft;

    /// Writes a submitted edit form back to `store`. `None` for kinds that
    /// have no edit form.
    fn save_edit(
        _store: &mut RecordStore<Self>,
        _id: Uuid,
        _fields: Self::Fields,
    ) -> Option<Result<&Self, StoreError>> {
        None
    }

    /// Short text naming the record in notifications.
    fn subject(&self) -> &str;

    fn created_notice(&self, kind: RecordKind, settings: &WorkflowSettings) -> Notification;

    fn rejected_notice(_kind: RecordKind, _errors: &FieldErrors) -> Option<Notification> {
        None
    }
}

/// Record types whose workflow offers edit and delete.
pub trait Editable: FormRecord + Patchable {
    fn to_draft(&self) -> Self::Draft;
}

impl FormRecord for FinancialEntry {
    type Draft = EntryDraft;

    fn validate(
        draft: &EntryDraft,
        settings: &WorkflowSettings,
    ) -> Result<Self::Fields, FieldErrors> {
        validate_entry(draft, &settings.rules)
    }

    fn blank_draft(date: NaiveDate, _settings: &WorkflowSettings) -> EntryDraft {
        EntryDraft::dated(date)
    }

    fn save_edit(
        store: &mut RecordStore<Self>,
        id: Uuid,
        fields: NewEntry,
    ) -> Option<Result<&Self, StoreError>> {
        Some(store.update(id, fields.into()))
    }

    fn subject(&self) -> &str {
        &self.description
    }

    fn created_notice(&self, kind: RecordKind, settings: &WorkflowSettings) -> Notification {
        Notification::success(
            format!("{kind} Entry Saved"),
            format!(
                "{} for {} has been recorded.",
                self.description,
                settings.money.format(self.amount)
            ),
        )
    }
}

impl Editable for FinancialEntry {
    fn to_draft(&self) -> EntryDraft {
        EntryDraft::from(self)
    }
}

impl FormRecord for Appointment {
    type Draft = AppointmentDraft;

    fn validate(
        draft: &AppointmentDraft,
        _settings: &WorkflowSettings,
    ) -> Result<Self::Fields, FieldErrors> {
        validate_appointment(draft)
    }

    fn blank_draft(date: NaiveDate, settings: &WorkflowSettings) -> AppointmentDraft {
        AppointmentDraft::blank(date, settings.default_start, settings.default_end)
    }

    fn subject(&self) -> &str {
        &self.title
    }

    fn created_notice(&self, _kind: RecordKind, _settings: &WorkflowSettings) -> Notification {
        Notification::success(
            "Appointment Created",
            format!(
                "Scheduled \"{}\" for {}.",
                self.title,
                format_date_style(DateFormatStyle::Long, self.date)
            ),
        )
    }

    fn rejected_notice(_kind: RecordKind, _errors: &FieldErrors) -> Option<Notification> {
        Some(Notification::destructive(
            "Missing Information",
            "Please fill in all required fields (title, date, start time, end time).",
        ))
    }
}

/// Draft plus the errors from the last rejected submit.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState<D> {
    pub draft: D,
    pub errors: FieldErrors,
}

impl<D> FormState<D> {
    fn new(draft: D) -> Self {
        Self {
            draft,
            errors: FieldErrors::new(),
        }
    }
}

/// State machine driving one record kind.
pub struct Workflow<R: FormRecord> {
    kind: RecordKind,
    store: RecordStore<R>,
    state: WorkflowState,
    form: Option<FormState<R::Draft>>,
    selected_date: NaiveDate,
    settings: WorkflowSettings,
    listeners: Listeners,
    pending: Vec<Notification>,
}

impl<R: FormRecord> Workflow<R> {
    pub fn new(store: RecordStore<R>, settings: WorkflowSettings, today: NaiveDate) -> Self {
        Self {
            kind: store.kind(),
            store,
            state: WorkflowState::Idle,
            form: None,
            selected_date: today,
            settings,
            listeners: Listeners::default(),
            pending: Vec::new(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn store(&self) -> &RecordStore<R> {
        &self.store
    }

    pub fn records(&self) -> &[R] {
        self.store.list()
    }

    pub fn form(&self) -> Option<&FormState<R::Draft>> {
        self.form.as_ref()
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Replaces rules and formats; applies to the next open form or submit.
    pub fn set_settings(&mut self, settings: WorkflowSettings) {
        self.settings = settings;
    }

    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Drains notifications raised since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    /// Opens a blank form dated on the selected day.
    pub fn open_new(&mut self) -> Result<&R::Draft, WorkflowError> {
        self.require(Intent::OpenNew, |state| state == WorkflowState::Idle)?;
        let draft = R::blank_draft(self.selected_date, &self.settings);
        Ok(self.enter_form(WorkflowState::Creating, draft))
    }

    /// Closes the form without touching the store.
    pub fn cancel(&mut self) -> Result<(), WorkflowError> {
        self.require(Intent::Cancel, |state| state.is_form_open())?;
        self.form = None;
        self.set_state(WorkflowState::Idle);
        Ok(())
    }

    /// Validates `draft` and applies it, returning the stored record's id.
    ///
    /// On validation failure the form stays open with the draft and its errors
    /// attached, and the store is untouched.
    pub fn submit(&mut self, draft: R::Draft) -> Result<Uuid, WorkflowError> {
        self.require(Intent::Submit, |state| state.is_form_open())?;

        let fields = match R::validate(&draft, &self.settings) {
            Ok(fields) => fields,
            Err(errors) => return Err(self.reject(draft, errors)),
        };

        match self.state {
            WorkflowState::Editing(id) => self.apply_edit(id, fields),
            _ => {
                let stored = self.store.add(fields);
                let id = stored.id();
                let notice = stored.created_notice(self.kind, &self.settings);
                self.finish_mutation(notice);
                Ok(id)
            }
        }
    }

    /// Changes the day new forms and day views refer to.
    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
        debug!(kind = %self.kind, %date, "date selected");
        self.listeners.emit(&WorkflowEvent::DateSelected {
            kind: self.kind,
            date,
        });
    }

    fn apply_edit(&mut self, id: Uuid, fields: R::Fields) -> Result<Uuid, WorkflowError> {
        match R::save_edit(&mut self.store, id, fields) {
            Some(Ok(updated)) => {
                let notice = Notification::success(
                    format!("{} Updated", self.kind),
                    format!("{} successfully updated.", updated.subject()),
                );
                self.finish_mutation(notice);
                Ok(id)
            }
            Some(Err(err)) => Err(self.stale(err)),
            None => Err(self.invalid(self.state, Intent::Submit)),
        }
    }

    fn reject(&mut self, draft: R::Draft, errors: FieldErrors) -> WorkflowError {
        debug!(kind = %self.kind, %errors, "submit rejected");
        self.form = Some(FormState {
            draft,
            errors: errors.clone(),
        });
        self.listeners.emit(&WorkflowEvent::ValidationFailed {
            kind: self.kind,
            errors: errors.clone(),
        });
        if let Some(notice) = R::rejected_notice(self.kind, &errors) {
            self.notify(notice);
        }
        WorkflowError::Validation(errors)
    }

    // Stale id: back to Idle with a notice. The store was not modified.
    fn stale(&mut self, err: StoreError) -> WorkflowError {
        warn!(kind = %self.kind, error = %err, "stale record reference");
        self.form = None;
        if self.state != WorkflowState::Idle {
            self.set_state(WorkflowState::Idle);
        }
        self.notify(Notification::destructive(
            format!("{} Not Found", self.kind),
            "The selected entry no longer exists.",
        ));
        WorkflowError::NotFound(err)
    }

    fn finish_mutation(&mut self, notice: Notification) {
        self.form = None;
        self.set_state(WorkflowState::Idle);
        self.listeners.emit(&WorkflowEvent::RecordsChanged {
            kind: self.kind,
            len: self.store.len(),
        });
        self.notify(notice);
    }

    fn require(
        &self,
        intent: Intent,
        allowed: impl Fn(WorkflowState) -> bool,
    ) -> Result<(), WorkflowError> {
        if allowed(self.state) {
            Ok(())
        } else {
            warn!(kind = %self.kind, state = %self.state, %intent, "rejected transition");
            Err(WorkflowError::InvalidTransition {
                state: self.state,
                intent,
            })
        }
    }

    // The form is in place before listeners hear about the new state.
    fn enter_form(&mut self, state: WorkflowState, draft: R::Draft) -> &R::Draft {
        debug!(kind = %self.kind, from = %self.state, to = %state, "workflow transition");
        self.state = state;
        let form = self.form.insert(FormState::new(draft));
        self.listeners.emit(&WorkflowEvent::StateChanged {
            kind: self.kind,
            state,
        });
        &form.draft
    }

    fn set_state(&mut self, state: WorkflowState) {
        debug!(kind = %self.kind, from = %self.state, to = %state, "workflow transition");
        self.state = state;
        self.listeners.emit(&WorkflowEvent::StateChanged {
            kind: self.kind,
            state,
        });
    }

    fn invalid(&self, state: WorkflowState, intent: Intent) -> WorkflowError {
        warn!(kind = %self.kind, %state, %intent, "rejected transition");
        WorkflowError::InvalidTransition { state, intent }
    }

    fn notify(&mut self, notice: Notification) {
        self.listeners.emit(&WorkflowEvent::Notified(notice.clone()));
        self.pending.push(notice);
    }
}

impl<R: Editable> Workflow<R> {
    /// Opens the form pre-filled from the record identified by `id`.
    pub fn open_edit(&mut self, id: Uuid) -> Result<&R::Draft, WorkflowError> {
        self.require(Intent::OpenEdit, |state| state == WorkflowState::Idle)?;
        let draft = match self.store.get(id) {
            Some(record) => record.to_draft(),
            None => return Err(self.stale(self.not_found(id))),
        };
        Ok(self.enter_form(WorkflowState::Editing(id), draft))
    }

    /// Asks for confirmation before removing the record identified by `id`.
    pub fn request_delete(&mut self, id: Uuid) -> Result<(), WorkflowError> {
        self.require(Intent::RequestDelete, |state| state == WorkflowState::Idle)?;
        if !self.store.contains(id) {
            return Err(self.stale(self.not_found(id)));
        }
        self.set_state(WorkflowState::ConfirmingDelete(id));
        Ok(())
    }

    /// Record awaiting delete confirmation, if any.
    pub fn pending_delete(&self) -> Option<&R> {
        match self.state {
            WorkflowState::ConfirmingDelete(id) => self.store.get(id),
            _ => None,
        }
    }

    pub fn confirm_delete(&mut self) -> Result<R, WorkflowError> {
        let id = match self.state {
            WorkflowState::ConfirmingDelete(id) => id,
            state => {
                return Err(self.invalid(state, Intent::ConfirmDelete));
            }
        };
        match self.store.remove(id) {
            Ok(removed) => {
                let notice = Notification::destructive(
                    format!("{} Deleted", self.kind),
                    format!("{} successfully deleted.", removed.subject()),
                );
                self.finish_mutation(notice);
                Ok(removed)
            }
            Err(err) => Err(self.stale(err)),
        }
    }

    pub fn dismiss_delete(&mut self) -> Result<(), WorkflowError> {
        self.require(Intent::DismissDelete, |state| {
            matches!(state, WorkflowState::ConfirmingDelete(_))
        })?;
        self.set_state(WorkflowState::Idle);
        Ok(())
    }

    fn not_found(&self, id: Uuid) -> StoreError {
        StoreError::NotFound {
            kind: self.kind,
            id,
        }
    }
}

impl Workflow<Appointment> {
    /// Appointments on the selected day, earliest start first.
    pub fn day_view(&self) -> Vec<&Appointment> {
        self.store.query_by_date(self.selected_date)
    }

    pub fn booked_dates(&self) -> Vec<NaiveDate> {
        self.store.booked_dates()
    }
}

impl<R: FormRecord> fmt::Debug for Workflow<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("records", &self.store.len())
            .field("selected_date", &self.selected_date)
            .field("listeners", &self.listeners)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 10).unwrap()
    }

    fn expenses() -> Workflow<FinancialEntry> {
        Workflow::new(
            RecordStore::new(RecordKind::Expense),
            WorkflowSettings::default(),
            today(),
        )
    }

    fn rent() -> EntryDraft {
        EntryDraft::new("2024-07-20", "Office Rent", "800", "Rent")
    }

    #[test]
    fn new_form_is_dated_on_selected_day() {
        let mut workflow = expenses();
        workflow.select_date(NaiveDate::from_ymd_opt(2024, 7, 2).unwrap());
        let draft = workflow.open_new().unwrap();
        assert_eq!(draft.date, "2024-07-02");
        assert_eq!(workflow.state(), WorkflowState::Creating);
    }

    #[test]
    fn create_round_trip_notifies_after_store_update() {
        let mut workflow = expenses();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        workflow.subscribe(Box::new(move |event| sink.borrow_mut().push(event.clone())));

        workflow.open_new().unwrap();
        let id = workflow.submit(rent()).unwrap();

        assert_eq!(workflow.state(), WorkflowState::Idle);
        assert!(workflow.form().is_none());
        assert_eq!(workflow.store().get(id).unwrap().amount, 800.0);

        let events = seen.borrow();
        assert!(matches!(
            events.last(),
            Some(WorkflowEvent::Notified(n)) if n.title == "Expense Entry Saved"
                && n.message == "Office Rent for $800.00 has been recorded."
        ));
        assert!(events.contains(&WorkflowEvent::RecordsChanged {
            kind: RecordKind::Expense,
            len: 1
        }));
    }

    #[test]
    fn invalid_submit_keeps_form_open_with_errors() {
        let mut workflow = expenses();
        workflow.open_new().unwrap();
        let bad = EntryDraft::new("2024-07-20", "Office Rent", "-5", "Rent");
        let err = workflow.submit(bad.clone()).unwrap_err();

        assert!(err.field_errors().unwrap().contains(crate::domain::Field::Amount));
        assert_eq!(workflow.state(), WorkflowState::Creating);
        let form = workflow.form().unwrap();
        assert_eq!(form.draft, bad);
        assert!(!form.errors.is_empty());
        assert!(workflow.records().is_empty());
        assert!(workflow.take_notifications().is_empty());
    }

    #[test]
    fn intents_outside_their_state_are_rejected() {
        let mut workflow = expenses();
        assert!(matches!(
            workflow.submit(rent()),
            Err(WorkflowError::InvalidTransition {
                state: WorkflowState::Idle,
                intent: Intent::Submit
            })
        ));
        workflow.open_new().unwrap();
        assert!(workflow.open_new().is_err());
        assert!(workflow.confirm_delete().is_err());
        assert_eq!(workflow.state(), WorkflowState::Creating);
    }

    #[test]
    fn edit_prefills_and_updates_in_place() {
        let mut workflow = expenses();
        workflow.open_new().unwrap();
        let id = workflow.submit(rent()).unwrap();
        workflow.take_notifications();

        let draft = workflow.open_edit(id).unwrap().clone();
        assert_eq!(draft.description, "Office Rent");
        assert_eq!(workflow.state(), WorkflowState::Editing(id));

        let changed = EntryDraft {
            amount: "850".into(),
            ..draft
        };
        assert_eq!(workflow.submit(changed).unwrap(), id);
        assert_eq!(workflow.records()[0].amount, 850.0);
        assert_eq!(workflow.records().len(), 1);

        let notices = workflow.take_notifications();
        assert_eq!(notices[0].title, "Expense Updated");
        assert_eq!(notices[0].message, "Office Rent successfully updated.");
    }

    #[test]
    fn stale_edit_returns_to_idle_with_notice() {
        let mut workflow = expenses();
        let err = workflow.open_edit(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound(_)));
        assert_eq!(workflow.state(), WorkflowState::Idle);
        let notices = workflow.take_notifications();
        assert!(notices[0].is_destructive());
        assert_eq!(notices[0].title, "Expense Not Found");
    }

    #[test]
    fn appointments_have_no_edit_path() {
        use crate::domain::NewAppointment;

        let slot = |title: &str| NewAppointment {
            title: title.into(),
            date: today(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            description: None,
        };
        let mut store: RecordStore<Appointment> = RecordStore::new(RecordKind::Appointment);
        let id = store.add(slot("Dentist")).id;

        assert!(Appointment::save_edit(&mut store, id, slot("Renamed")).is_none());
        assert_eq!(store.get(id).unwrap().title, "Dentist");
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut workflow = expenses();
        workflow.open_new().unwrap();
        let id = workflow.submit(rent()).unwrap();

        workflow.request_delete(id).unwrap();
        assert_eq!(workflow.pending_delete().map(|e| e.id), Some(id));
        assert!(workflow.open_new().is_err());

        let removed = workflow.confirm_delete().unwrap();
        assert_eq!(removed.id, id);
        assert!(workflow.records().is_empty());
        let last = workflow.take_notifications().pop().unwrap();
        assert!(last.is_destructive());
        assert_eq!(last.message, "Office Rent successfully deleted.");
    }
}
