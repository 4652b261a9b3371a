pub mod appointment;
pub mod common;
pub mod display;
pub mod entry;
pub mod validation;

pub use appointment::{Appointment, AppointmentDraft, NewAppointment};
pub use common::{Dated, Identifiable, RecordKind};
pub use display::{ChartSeries, KindDescriptor, MetricKey, Tone};
pub use entry::{EntryDraft, EntryPatch, FinancialEntry, NewEntry};
pub use validation::{
    validate_appointment, validate_entry, Field, FieldErrors, LengthRule, ValidationRules,
};
