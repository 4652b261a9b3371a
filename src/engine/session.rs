//! One dashboard session: a workflow per record kind.

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{Appointment, FinancialEntry, RecordKind};
use crate::engine::clock::Clock;
use crate::engine::seed;
use crate::engine::services::{FinancialSummary, SummaryService};
use crate::engine::store::RecordStore;
use crate::engine::workflow::{Workflow, WorkflowSettings};

#[derive(Debug)]
pub struct Session {
    pub income: Workflow<FinancialEntry>,
    pub expenses: Workflow<FinancialEntry>,
    pub appointments: Workflow<Appointment>,
    today: NaiveDate,
}

impl Session {
    /// Builds a session loaded with the mock datasets.
    pub fn seeded(settings: WorkflowSettings, clock: &dyn Clock) -> Self {
        let today = clock.today();
        let session = Self::build(
            RecordStore::seeded(RecordKind::Income, seed::income()),
            RecordStore::seeded(RecordKind::Expense, seed::expenses()),
            RecordStore::seeded(RecordKind::Appointment, seed::appointments(today)),
            settings,
            today,
        );
        info!(
            %today,
            income = session.income.store().len(),
            expenses = session.expenses.store().len(),
            appointments = session.appointments.store().len(),
            "seeded session"
        );
        session
    }

    pub fn empty(settings: WorkflowSettings, clock: &dyn Clock) -> Self {
        let today = clock.today();
        info!(%today, "empty session");
        Self::build(
            RecordStore::new(RecordKind::Income),
            RecordStore::new(RecordKind::Expense),
            RecordStore::new(RecordKind::Appointment),
            settings,
            today,
        )
    }

    fn build(
        income: RecordStore<FinancialEntry>,
        expenses: RecordStore<FinancialEntry>,
        appointments: RecordStore<Appointment>,
        settings: WorkflowSettings,
        today: NaiveDate,
    ) -> Self {
        Self {
            income: Workflow::new(income, settings.clone(), today),
            expenses: Workflow::new(expenses, settings.clone(), today),
            appointments: Workflow::new(appointments, settings, today),
            today,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Income or expense workflow for `kind`; `None` for appointments.
    pub fn entries(&self, kind: RecordKind) -> Option<&Workflow<FinancialEntry>> {
        match kind {
            RecordKind::Income => Some(&self.income),
            RecordKind::Expense => Some(&self.expenses),
            RecordKind::Appointment => None,
        }
    }

    pub fn entries_mut(&mut self, kind: RecordKind) -> Option<&mut Workflow<FinancialEntry>> {
        match kind {
            RecordKind::Income => Some(&mut self.income),
            RecordKind::Expense => Some(&mut self.expenses),
            RecordKind::Appointment => None,
        }
    }

    pub fn apply_settings(&mut self, settings: WorkflowSettings) {
        self.income.set_settings(settings.clone());
        self.expenses.set_settings(settings.clone());
        self.appointments.set_settings(settings);
    }

    pub fn summary(&self) -> FinancialSummary {
        SummaryService::totals(self.income.records(), self.expenses.records())
    }
}
