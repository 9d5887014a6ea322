use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::calendar::add_days;
use crate::debit::resolver::{installment_amount, next_occurrence, normalize_reference_date, schedule_for};
use crate::error::DebitScheduleError;
use crate::loan::{LoanTerms, ScheduleType};
use crate::schedule::occurrences::BIWEEKLY_STEP_DAYS;
use crate::schedule::{build_occurrence_table, OccurrenceTable};
use crate::types::{with_metadata, ComputationOutput, DebitRecord, MinorUnits, MonthKey};
use crate::DebitScheduleResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingDebits {
    pub reference_date: NaiveDate,
    pub debits: Vec<DebitRecord>,
    pub monthly_totals: Vec<MonthTotal>,
}

/// What a borrower pays across one calendar month of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTotal {
    pub month: String,
    pub installments: usize,
    pub installment_amount: MinorUnits,
    pub total: MinorUnits,
    /// Amount collected above the monthly obligation because of rounding up.
    pub overage: MinorUnits,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// The next `count` debits, starting with the one [`resolve_next_debit`]
/// returns and following the biweekly cadence from there.
///
/// [`resolve_next_debit`]: crate::debit::resolve_next_debit
pub fn upcoming_debits(
    loan: &LoanTerms,
    now: DateTime<Utc>,
    count: usize,
) -> DebitScheduleResult<ComputationOutput<UpcomingDebits>> {
    let start = Instant::now();

    if count == 0 {
        return Err(DebitScheduleError::InvalidInput {
            field: "count".into(),
            reason: "At least one debit must be requested".into(),
        });
    }

    let result = match schedule_for(loan) {
        ScheduleType::Biweekly | ScheduleType::Unrecognized => {
            upcoming_biweekly(loan, now.date_naive(), count)?
        }
    };

    let mut warnings = Vec::new();
    if loan.schedule_type == Some(ScheduleType::Unrecognized) {
        warnings.push("Unrecognized schedule type; biweekly schedule applied.".to_string());
    }
    for month in result.monthly_totals.iter().filter(|m| m.overage > 0) {
        warnings.push(format!(
            "{}: {} installments of {} collect {} above the monthly amount.",
            month.month, month.installments, month.installment_amount, month.overage
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Biweekly schedule from the debit start date; monthly amount split across each month's debits, rounded up",
        loan,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn upcoming_biweekly(
    loan: &LoanTerms,
    today: NaiveDate,
    count: usize,
) -> DebitScheduleResult<UpcomingDebits> {
    let reference = normalize_reference_date(loan.debit_start_date, today)?;

    // The first debit is at most one step past the reference date, so this
    // target covers every listed debit's month.
    let span = BIWEEKLY_STEP_DAYS.saturating_mul(count as u64);
    let target = add_days(reference, span)?;
    let table = build_occurrence_table(loan.debit_start_date, target)?;

    let first = next_occurrence(&table, reference)?;
    let debits = table
        .dates()
        .filter(|d| *d >= first)
        .take(count)
        .map(|date| {
            let installments = table.occurrences_in(MonthKey::of(date));
            installment_amount(loan.monthly_payment_amount, installments)
                .map(|amount| DebitRecord { amount, date })
        })
        .collect::<DebitScheduleResult<Vec<_>>>()?;

    let monthly_totals = month_totals(&table, &debits, loan.monthly_payment_amount)?;

    Ok(UpcomingDebits {
        reference_date: reference,
        debits,
        monthly_totals,
    })
}

fn month_totals(
    table: &OccurrenceTable,
    debits: &[DebitRecord],
    monthly_payment_amount: MinorUnits,
) -> DebitScheduleResult<Vec<MonthTotal>> {
    let mut months: Vec<MonthKey> = debits.iter().map(|d| MonthKey::of(d.date)).collect();
    months.dedup();

    months
        .into_iter()
        .map(|month| {
            let installments = table.occurrences_in(month);
            let amount = installment_amount(monthly_payment_amount, installments)?;
            let total = amount
                .checked_mul(installments as MinorUnits)
                .ok_or_else(|| DebitScheduleError::InvalidInput {
                    field: "monthly_payment_amount".into(),
                    reason: format!("{month} installments total more than {}", MinorUnits::MAX),
                })?;
            Ok(MonthTotal {
                month: month.to_string(),
                installments,
                installment_amount: amount,
                total,
                overage: total.saturating_sub(monthly_payment_amount),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debit::resolve_next_debit;
    use chrono::TimeZone;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn at(y: i32, m: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_first_upcoming_matches_resolver() {
        let loan = LoanTerms::new(1000, d(2023, 3, 1));
        let now = at(2023, 3, 29);
        let output = upcoming_debits(&loan, now, 4).unwrap();
        assert_eq!(output.result.debits[0], resolve_next_debit(&loan, now).unwrap());
    }

    #[test]
    fn test_upcoming_amounts_follow_month_counts() {
        // Anchor 2023-01-02: January 3 debits, February 2, March 2.
        let loan = LoanTerms::new(1000, d(2023, 1, 2));
        let output = upcoming_debits(&loan, at(2023, 1, 1), 6).unwrap();
        let debits = &output.result.debits;
        assert_eq!(debits.len(), 6);
        assert_eq!(debits[0], DebitRecord { amount: 334, date: d(2023, 1, 2) });
        assert_eq!(debits[2], DebitRecord { amount: 334, date: d(2023, 1, 30) });
        assert_eq!(debits[3], DebitRecord { amount: 500, date: d(2023, 2, 13) });
        assert_eq!(debits[5], DebitRecord { amount: 500, date: d(2023, 3, 13) });
    }

    #[test]
    fn test_month_totals_report_overage() {
        let loan = LoanTerms::new(1000, d(2023, 1, 2));
        let output = upcoming_debits(&loan, at(2023, 1, 1), 4).unwrap();
        let jan = &output.result.monthly_totals[0];
        assert_eq!(jan.month, "2023-01");
        assert_eq!(jan.total, 1002);
        assert_eq!(jan.overage, 2);
        assert!(output.warnings.iter().any(|w| w.starts_with("2023-01")));
    }

    #[test]
    fn test_zero_count_rejected() {
        let loan = LoanTerms::new(1000, d(2023, 1, 2));
        let err = upcoming_debits(&loan, at(2023, 1, 1), 0).unwrap_err();
        match err {
            DebitScheduleError::InvalidInput { field, .. } => assert_eq!(field, "count"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_month_total_overflow_is_error() {
        // February 2023 from a 2023-01-02 anchor has 2 debits of 2^63 each.
        let loan = LoanTerms::new(u64::MAX, d(2023, 1, 2));
        let err = upcoming_debits(&loan, at(2023, 2, 1), 2).unwrap_err();
        match err {
            DebitScheduleError::InvalidInput { field, .. } => assert_eq!(field, "monthly_payment_amount"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
        // The single next debit is still resolvable.
        let debit = resolve_next_debit(&loan, at(2023, 2, 1)).unwrap();
        assert_eq!(debit, DebitRecord { amount: 1 << 63, date: d(2023, 2, 13) });
    }

    #[test]
    fn test_unrecognized_schedule_warns() {
        let loan = LoanTerms::new(1000, d(2023, 1, 2)).with_schedule_type(ScheduleType::Unrecognized);
        let output = upcoming_debits(&loan, at(2023, 1, 1), 1).unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("Unrecognized")));
    }
}
