pub mod calendar;
pub mod debit;
pub mod error;
pub mod loan;
pub mod schedule;
pub mod types;

pub use debit::{next_debit, resolve_next_debit, resolve_next_debit_on, upcoming_debits};
pub use error::DebitScheduleError;
pub use loan::{LoanPayload, LoanTerms, NextDebitRequest, NextDebitResponse, ScheduleType};
pub use schedule::{build_occurrence_table, OccurrenceTable};
pub use types::*;

/// Standard result type for all debit-schedule operations
pub type DebitScheduleResult<T> = Result<T, DebitScheduleError>;
