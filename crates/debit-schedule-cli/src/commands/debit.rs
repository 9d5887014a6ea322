use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use clap::Args;
use serde_json::{json, Value};

use debit_schedule_core::calendar::parse_date;
use debit_schedule_core::debit::{self, normalize_reference_date};
use debit_schedule_core::schedule::build_occurrence_table;
use debit_schedule_core::{LoanPayload, LoanTerms, NextDebitRequest, ScheduleType};

use crate::input;

/// Loan terms and reference date shared by every debit command
#[derive(Args)]
pub struct LoanArgs {
    /// Path to a JSON request body `{"loan": {...}}` (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly payment amount in minor currency units
    #[arg(long, alias = "amount")]
    pub monthly_payment_amount: Option<u64>,

    /// First debit date (YYYY-MM-DD), the anchor of the biweekly cadence
    #[arg(long, alias = "start")]
    pub debit_start_date: Option<String>,

    /// Schedule type; anything other than "biweekly" is served biweekly
    #[arg(long)]
    pub schedule_type: Option<ScheduleType>,

    /// Day of month the payment is due
    #[arg(long, allow_hyphen_values = true)]
    pub payment_due_date: Option<i64>,

    /// Preferred debit weekday
    #[arg(long)]
    pub debit_day_of_week: Option<String>,

    /// Resolve as if today were this date (YYYY-MM-DD) instead of the current UTC date
    #[arg(long, env = "DEBIT_AS_OF")]
    pub as_of: Option<String>,
}

/// Arguments for next-debit resolution
#[derive(Args)]
pub struct NextDebitArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

/// Arguments for the upcoming-debits listing
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Number of debits to list
    #[arg(long, default_value_t = 6)]
    pub count: usize,
}

/// Arguments for the occurrence table dump
#[derive(Args)]
pub struct OccurrencesArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

pub fn run_next_debit(args: NextDebitArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let now = reference_now(&args.loan)?;
    let request = loan_request(args.loan)?;
    let response = debit::next_debit(request, now)?;
    Ok(serde_json::to_value(response)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let now = reference_now(&args.loan)?;
    let loan = loan_terms(args.loan)?;
    let result = debit::upcoming_debits(&loan, now, args.count)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_occurrences(args: OccurrencesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let now = reference_now(&args.loan)?;
    let loan = loan_terms(args.loan)?;
    let reference = normalize_reference_date(loan.debit_start_date, now.date_naive())?;
    let table = build_occurrence_table(loan.debit_start_date, reference)?;
    Ok(json!({
        "reference_date": reference,
        "months": table.month_schedules(),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn reference_now(args: &LoanArgs) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    match args.as_of {
        Some(ref raw) => {
            let date = parse_date("--as-of", raw)?;
            Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
        }
        None => Ok(Utc::now()),
    }
}

fn loan_terms(args: LoanArgs) -> Result<LoanTerms, Box<dyn std::error::Error>> {
    Ok(loan_request(args)?.loan_terms()?)
}

fn loan_request(args: LoanArgs) -> Result<NextDebitRequest, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(NextDebitRequest::from_value(data)?);
    }

    Ok(NextDebitRequest {
        loan: Some(LoanPayload {
            monthly_payment_amount: Some(
                args.monthly_payment_amount
                    .ok_or("--monthly-payment-amount is required (or provide --input)")?,
            ),
            debit_start_date: Some(
                args.debit_start_date
                    .ok_or("--debit-start-date is required (or provide --input)")?,
            ),
            schedule_type: args.schedule_type,
            payment_due_date: args.payment_due_date,
            debit_day_of_week: args.debit_day_of_week,
        }),
    })
}
