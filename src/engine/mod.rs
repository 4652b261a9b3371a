pub mod clock;
pub mod events;
pub mod seed;
pub mod services;
pub mod session;
pub mod store;
pub mod workflow;

pub use clock::{Clock, FixedClock, SystemClock};
pub use events::{ListenerId, Notification, NotificationVariant, WorkflowEvent};
pub use session::Session;
pub use store::{Patchable, Placement, Record, RecordStore};
pub use workflow::{
    Editable, FormRecord, FormState, Intent, Workflow, WorkflowSettings, WorkflowState,
};
