use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calendar::{add_days, add_months};
use crate::types::MonthKey;
use crate::DebitScheduleResult;

/// Days between consecutive biweekly occurrences.
pub const BIWEEKLY_STEP_DAYS: u64 = 14;

/// Calendar months the table extends past the target date. The next-month
/// fallback in the resolver reads from this margin.
pub const HORIZON_MARGIN_MONTHS: u32 = 2;

// ---------------------------------------------------------------------------
// Occurrence table
// ---------------------------------------------------------------------------

/// Biweekly occurrences grouped by calendar month, each month's dates in
/// ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceTable {
    anchor: Option<NaiveDate>,
    months: BTreeMap<MonthKey, Vec<NaiveDate>>,
}

/// One serializable row of an [`OccurrenceTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSchedule {
    pub month: String,
    pub occurrences: usize,
    pub dates: Vec<NaiveDate>,
}

impl OccurrenceTable {
    fn push(&mut self, date: NaiveDate) {
        self.anchor.get_or_insert(date);
        self.months.entry(MonthKey::of(date)).or_default().push(date);
    }

    /// First occurrence pushed into the table.
    pub fn anchor(&self) -> Option<NaiveDate> {
        self.anchor
    }

    pub fn get(&self, month: MonthKey) -> Option<&[NaiveDate]> {
        self.months.get(&month).map(Vec::as_slice)
    }

    /// Number of occurrences falling in `month`; zero when the month is not
    /// covered.
    pub fn occurrences_in(&self, month: MonthKey) -> usize {
        self.months.get(&month).map_or(0, Vec::len)
    }

    pub fn months(&self) -> impl Iterator<Item = MonthKey> + '_ {
        self.months.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MonthKey, &[NaiveDate])> {
        self.months.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// All occurrences in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.months.values().flatten().copied()
    }

    /// Number of months in the table.
    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Last occurrence generated.
    pub fn last(&self) -> Option<NaiveDate> {
        self.months.values().next_back().and_then(|v| v.last().copied())
    }

    pub fn month_schedules(&self) -> Vec<MonthSchedule> {
        self.iter()
            .map(|(month, dates)| MonthSchedule {
                month: month.to_string(),
                occurrences: dates.len(),
                dates: dates.to_vec(),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Generate every biweekly occurrence from `start_date` until one falls past
/// `target_date` plus [`HORIZON_MARGIN_MONTHS`]. The first occurrence beyond
/// the horizon is kept.
pub fn build_occurrence_table(
    start_date: NaiveDate,
    target_date: NaiveDate,
) -> DebitScheduleResult<OccurrenceTable> {
    let horizon = add_months(target_date, HORIZON_MARGIN_MONTHS)?;

    let mut table = OccurrenceTable::default();
    let mut current = start_date;
    table.push(current);

    while current <= horizon {
        current = add_days(current, BIWEEKLY_STEP_DAYS)?;
        table.push(current);
    }

    tracing::trace!(
        start = %start_date,
        target = %target_date,
        %horizon,
        months = table.len(),
        "built biweekly occurrence table"
    );

    Ok(table)
}
