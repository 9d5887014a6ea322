pub mod resolver;
pub mod upcoming;

pub use resolver::{
    installment_amount, next_debit, next_occurrence, normalize_reference_date, resolve_next_debit,
    resolve_next_debit_on,
};
pub use upcoming::{upcoming_debits, MonthTotal, UpcomingDebits};
