pub mod occurrences;

pub use occurrences::{build_occurrence_table, MonthSchedule, OccurrenceTable};
