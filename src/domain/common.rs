use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Exposes the calendar day a record is filed under.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// The three collections the dashboard manages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    Income,
    Expense,
    Appointment,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [
        RecordKind::Income,
        RecordKind::Expense,
        RecordKind::Appointment,
    ];

    /// Singular, capitalised label ("Income", "Expense", "Appointment").
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Income => "Income",
            RecordKind::Expense => "Expense",
            RecordKind::Appointment => "Appointment",
        }
    }

    pub fn is_financial(self) -> bool {
        matches!(self, RecordKind::Income | RecordKind::Expense)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;
pub use uuid;
