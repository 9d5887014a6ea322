use chrono::{DateTime, NaiveDate, Utc};

use crate::calendar::{add_days, add_months, roll_to_monday};
use crate::error::DebitScheduleError;
use crate::loan::{LoanTerms, NextDebitRequest, NextDebitResponse, ScheduleType};
use crate::schedule::{build_occurrence_table, OccurrenceTable};
use crate::types::{DebitRecord, MinorUnits, MonthKey};
use crate::DebitScheduleResult;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Resolve the next debit for `loan` as seen at `now` (UTC, date granularity).
pub fn resolve_next_debit(loan: &LoanTerms, now: DateTime<Utc>) -> DebitScheduleResult<DebitRecord> {
    resolve_next_debit_on(loan, now.date_naive())
}

/// Resolve the next debit for `loan` when the current calendar date is `today`.
pub fn resolve_next_debit_on(loan: &LoanTerms, today: NaiveDate) -> DebitScheduleResult<DebitRecord> {
    match schedule_for(loan) {
        ScheduleType::Biweekly | ScheduleType::Unrecognized => next_biweekly_debit(loan, today),
    }
}

/// Request-level entry point: validate the `loan` body and wrap the result in
/// the `{"debit": ..}` envelope.
pub fn next_debit(request: NextDebitRequest, now: DateTime<Utc>) -> DebitScheduleResult<NextDebitResponse> {
    let loan = request.loan_terms()?;
    let debit = resolve_next_debit(&loan, now)?;
    Ok(NextDebitResponse { debit })
}

/// The date the next debit is sought from: tomorrow, rolled off the weekend,
/// never before the loan's first debit.
pub fn normalize_reference_date(
    debit_start_date: NaiveDate,
    today: NaiveDate,
) -> DebitScheduleResult<NaiveDate> {
    let tomorrow = roll_to_monday(add_days(today, 1)?)?;
    let reference = tomorrow.max(debit_start_date);

    tracing::debug!(%today, %tomorrow, %reference, "normalized reference date");
    Ok(reference)
}

/// First occurrence on or after `reference`. When every occurrence in the
/// reference month is earlier, the first occurrence of the following month is
/// used.
pub fn next_occurrence(table: &OccurrenceTable, reference: NaiveDate) -> DebitScheduleResult<NaiveDate> {
    let this_month = table.get(MonthKey::of(reference)).unwrap_or_default();
    if let Some(date) = this_month.iter().find(|d| **d >= reference) {
        return Ok(*date);
    }

    let next_month = MonthKey::of(add_months(reference, 1)?);
    tracing::debug!(%reference, month = %next_month, "no occurrence left this month, rolling over");

    table
        .get(next_month)
        .and_then(|dates| dates.first().copied())
        .ok_or(DebitScheduleError::IncompleteSchedule { month: next_month })
}

/// Ceiling split of the monthly amount across `installments` debits.
pub fn installment_amount(
    monthly_payment_amount: MinorUnits,
    installments: usize,
) -> DebitScheduleResult<MinorUnits> {
    if installments == 0 {
        return Err(DebitScheduleError::InvalidInput {
            field: "installments".into(),
            reason: "Installment count must be at least 1".into(),
        });
    }
    Ok(monthly_payment_amount.div_ceil(installments as MinorUnits))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn schedule_for(loan: &LoanTerms) -> ScheduleType {
    let schedule_type = loan.schedule_type.unwrap_or_default();
    if schedule_type == ScheduleType::Unrecognized {
        tracing::warn!("unrecognized schedule type, using biweekly");
    }
    schedule_type
}

fn next_biweekly_debit(loan: &LoanTerms, today: NaiveDate) -> DebitScheduleResult<DebitRecord> {
    let reference = normalize_reference_date(loan.debit_start_date, today)?;
    let table = build_occurrence_table(loan.debit_start_date, reference)?;
    let date = next_occurrence(&table, reference)?;
    let installments = table.occurrences_in(MonthKey::of(date));
    let amount = installment_amount(loan.monthly_payment_amount, installments)?;

    tracing::debug!(%date, amount, installments, "resolved next debit");
    Ok(DebitRecord { amount, date })
}
