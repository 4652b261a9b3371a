pub mod summary_service;

pub use summary_service::{FinancialMetric, FinancialSummary, MonthlyData, SummaryService};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Invalid(String),
}
