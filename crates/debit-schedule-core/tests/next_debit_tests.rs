use chrono::{NaiveDate, TimeZone, Utc};
use debit_schedule_core::debit::{self, next_occurrence, normalize_reference_date};
use debit_schedule_core::schedule::build_occurrence_table;
use debit_schedule_core::{
    DebitRecord, DebitScheduleError, LoanTerms, MonthKey, NextDebitRequest, ScheduleType,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn request(amount: u64, start: &str) -> NextDebitRequest {
    NextDebitRequest::from_value(json!({
        "loan": {
            "monthly_payment_amount": amount,
            "payment_due_date": 1,
            "schedule_type": "biweekly",
            "debit_start_date": start,
            "debit_day_of_week": "monday"
        }
    }))
    .unwrap()
}

// ===========================================================================
// Reference scenarios
// ===========================================================================

#[test]
fn test_start_of_year_three_january_debits() {
    let loan = request(1000, "2023-01-02").loan_terms().unwrap();
    let now = Utc.with_ymd_and_hms(2023, 1, 1, 8, 30, 0).unwrap();

    let table = build_occurrence_table(loan.debit_start_date, d(2023, 1, 2)).unwrap();
    assert_eq!(
        table.get(MonthKey::new(2023, 1)).unwrap(),
        &[d(2023, 1, 2), d(2023, 1, 16), d(2023, 1, 30)]
    );

    let debit = debit::resolve_next_debit(&loan, now).unwrap();
    assert_eq!(debit, DebitRecord { amount: 334, date: d(2023, 1, 2) });
}

#[test]
fn test_friday_looks_ahead_to_monday() {
    // 2023-02-10 is a Friday, tomorrow is a Saturday
    assert_eq!(normalize_reference_date(d(2023, 1, 2), d(2023, 2, 10)).unwrap(), d(2023, 2, 13));

    // Anchor 2023-01-02 puts a debit on Monday 2023-02-13
    let loan = LoanTerms::new(1000, d(2023, 1, 2));
    let debit = debit::resolve_next_debit_on(&loan, d(2023, 2, 10)).unwrap();
    assert_eq!(debit, DebitRecord { amount: 500, date: d(2023, 2, 13) });
}

#[test]
fn test_reference_past_last_occurrence_rolls_to_next_month() {
    // Anchor 2023-05-14: May 14 and 28. June: 11, 25.
    // Today Sunday 2023-05-28 -> tomorrow Monday 29th, past the last May debit.
    let loan = LoanTerms::new(999, d(2023, 5, 14));
    let debit = debit::resolve_next_debit_on(&loan, d(2023, 5, 28)).unwrap();
    assert_eq!(debit, DebitRecord { amount: 500, date: d(2023, 6, 11) });
}

#[test]
fn test_same_day_is_never_targeted() {
    // Today is itself a debit date (Monday 2023-01-16); the next one is two weeks out.
    let loan = LoanTerms::new(1000, d(2023, 1, 2));
    let debit = debit::resolve_next_debit_on(&loan, d(2023, 1, 16)).unwrap();
    assert_eq!(debit.date, d(2023, 1, 30));
}

#[test]
fn test_future_start_date_is_first_debit() {
    let loan = LoanTerms::new(1200, d(2024, 8, 1));
    let debit = debit::resolve_next_debit_on(&loan, d(2024, 2, 6)).unwrap();
    // August 2024 from an Aug 1 anchor: 1, 15, 29
    assert_eq!(debit, DebitRecord { amount: 400, date: d(2024, 8, 1) });
}

#[test]
fn test_start_alone_in_its_month_pays_full_amount() {
    // Anchor on the 31st: the first month has a single debit.
    let loan = LoanTerms::new(1000, d(2023, 1, 31));
    let debit = debit::resolve_next_debit_on(&loan, d(2023, 1, 10)).unwrap();
    assert_eq!(debit, DebitRecord { amount: 1000, date: d(2023, 1, 31) });
}

#[test]
fn test_leap_february() {
    // Anchor 2024-02-01: February 2024 has 1, 15, 29.
    let loan = LoanTerms::new(100, d(2024, 2, 1));
    let debit = debit::resolve_next_debit_on(&loan, d(2024, 2, 27)).unwrap();
    assert_eq!(debit, DebitRecord { amount: 34, date: d(2024, 2, 29) });
}

#[test]
fn test_year_boundary_rollover() {
    // Anchor 2023-12-01: December 1, 15, 29; January 12, 26.
    let loan = LoanTerms::new(1000, d(2023, 12, 1));
    // Friday 2023-12-29 -> Saturday -> Monday 2024-01-01
    let debit = debit::resolve_next_debit_on(&loan, d(2023, 12, 29)).unwrap();
    assert_eq!(debit, DebitRecord { amount: 500, date: d(2024, 1, 12) });
}

#[test]
fn test_old_anchor_still_aligned() {
    let start = d(2019, 4, 1);
    let loan = LoanTerms::new(2000, start);
    let debit = debit::resolve_next_debit_on(&loan, d(2023, 6, 14)).unwrap();
    assert_eq!((debit.date - start).num_days() % 14, 0);
    assert!(debit.date > d(2023, 6, 14));
}

#[test]
fn test_unknown_schedule_type_served_biweekly() {
    let body = json!({
        "loan": {
            "monthly_payment_amount": 1000,
            "schedule_type": "semimonthly",
            "debit_start_date": "2023-01-02"
        }
    });
    let loan = NextDebitRequest::from_value(body).unwrap().loan_terms().unwrap();
    assert_eq!(loan.schedule_type, Some(ScheduleType::Unrecognized));
    let debit = debit::resolve_next_debit_on(&loan, d(2023, 1, 1)).unwrap();
    assert_eq!(debit, DebitRecord { amount: 334, date: d(2023, 1, 2) });
}

// ===========================================================================
// Envelope
// ===========================================================================

#[test]
fn test_response_body_shape() {
    let now = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let response = debit::next_debit(request(1000, "2023-01-02"), now).unwrap();
    assert_eq!(
        serde_json::to_value(response).unwrap(),
        json!({"debit": {"amount": 334, "date": "2023-01-02"}})
    );
}

#[test]
fn test_malformed_inputs_are_client_errors() {
    let now = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();

    let missing_loan = NextDebitRequest::from_json(r#"{"other": 1}"#).unwrap();
    let err = debit::next_debit(missing_loan, now).unwrap_err();
    assert!(err.is_malformed_input());

    let bad_date = request(1000, "not-a-date");
    let err = debit::next_debit(bad_date, now).unwrap_err();
    assert!(matches!(err, DebitScheduleError::DateError(_)));

    let err = NextDebitRequest::from_json("not json").unwrap_err();
    assert!(err.is_malformed_input());
}

// ===========================================================================
// Horizon coupling
// ===========================================================================

#[test]
fn test_fallback_month_always_present_after_resolution() {
    // Every reference in a year, anchored on a month-end date so the fallback
    // fires often; the table built for the reference must serve it.
    let start = d(2023, 1, 31);
    let mut today = d(2023, 1, 1);
    while today < d(2024, 1, 1) {
        let reference = normalize_reference_date(start, today).unwrap();
        let table = build_occurrence_table(start, reference).unwrap();
        assert!(next_occurrence(&table, reference).is_ok(), "no debit found for {reference}");
        today = today.succ_opt().unwrap();
    }
}
