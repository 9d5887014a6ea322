use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use napi::Result as NapiResult;
use napi_derive::napi;

use debit_schedule_core::calendar::parse_date;
use debit_schedule_core::debit;
use debit_schedule_core::NextDebitRequest;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Midnight UTC of `as_of`, or the current instant when absent.
fn reference_now(as_of: Option<String>) -> NapiResult<DateTime<Utc>> {
    match as_of {
        Some(raw) => {
            let date = parse_date("asOf", &raw).map_err(to_napi_error)?;
            Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
        }
        None => Ok(Utc::now()),
    }
}

// ---------------------------------------------------------------------------
// Debits
// ---------------------------------------------------------------------------

#[napi]
pub fn next_debit(request_json: String, as_of: Option<String>) -> NapiResult<String> {
    let now = reference_now(as_of)?;
    let request = NextDebitRequest::from_json(&request_json).map_err(to_napi_error)?;
    let response = debit::next_debit(request, now).map_err(to_napi_error)?;
    response.to_json().map_err(to_napi_error)
}

#[napi]
pub fn upcoming_debits(request_json: String, count: u32, as_of: Option<String>) -> NapiResult<String> {
    let now = reference_now(as_of)?;
    let loan = NextDebitRequest::from_json(&request_json)
        .and_then(NextDebitRequest::loan_terms)
        .map_err(to_napi_error)?;
    let output = debit::upcoming_debits(&loan, now, count as usize).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
