use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::parse_date;
use crate::error::DebitScheduleError;
use crate::types::{DebitRecord, MinorUnits};
use crate::DebitScheduleResult;

// ---------------------------------------------------------------------------
// Schedule type
// ---------------------------------------------------------------------------

/// Repayment cadence requested by the loan. Anything other than `biweekly`
/// (case-insensitive) parses to `Unrecognized` and is served by the biweekly
/// calculator. The wire and CLI forms both go through `FromStr`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ScheduleType {
    #[default]
    Biweekly,
    Unrecognized,
}

impl From<String> for ScheduleType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(schedule_type) => schedule_type,
            Err(never) => match never {},
        }
    }
}

impl std::fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Biweekly => "biweekly",
            Self::Unrecognized => "unrecognized",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for ScheduleType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "biweekly" => Self::Biweekly,
            _ => Self::Unrecognized,
        })
    }
}

// ---------------------------------------------------------------------------
// Loan terms
// ---------------------------------------------------------------------------

/// Validated loan terms consumed by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanTerms {
    pub monthly_payment_amount: MinorUnits,
    pub debit_start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_type: Option<ScheduleType>,
    /// Day of month the payment is due. Not used by the biweekly calculator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_due_date: Option<i64>,
    /// Preferred weekday for debits. Not used by the biweekly calculator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debit_day_of_week: Option<String>,
}

impl LoanTerms {
    pub fn new(monthly_payment_amount: MinorUnits, debit_start_date: NaiveDate) -> Self {
        Self {
            monthly_payment_amount,
            debit_start_date,
            schedule_type: None,
            payment_due_date: None,
            debit_day_of_week: None,
        }
    }

    pub fn with_schedule_type(mut self, schedule_type: ScheduleType) -> Self {
        self.schedule_type = Some(schedule_type);
        self
    }
}

/// Loan object as it arrives on the wire, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanPayload {
    #[serde(default)]
    pub monthly_payment_amount: Option<MinorUnits>,
    #[serde(default)]
    pub payment_due_date: Option<i64>,
    #[serde(default)]
    pub schedule_type: Option<ScheduleType>,
    #[serde(default)]
    pub debit_start_date: Option<String>,
    #[serde(default)]
    pub debit_day_of_week: Option<String>,
}

impl TryFrom<LoanPayload> for LoanTerms {
    type Error = DebitScheduleError;

    fn try_from(payload: LoanPayload) -> DebitScheduleResult<Self> {
        let monthly_payment_amount = payload
            .monthly_payment_amount
            .ok_or_else(|| DebitScheduleError::MissingField("loan.monthly_payment_amount".into()))?;
        if monthly_payment_amount == 0 {
            return Err(DebitScheduleError::InvalidInput {
                field: "monthly_payment_amount".into(),
                reason: "Monthly payment amount must be positive".into(),
            });
        }

        let raw_start = payload
            .debit_start_date
            .ok_or_else(|| DebitScheduleError::MissingField("loan.debit_start_date".into()))?;
        let debit_start_date = parse_date("debit_start_date", &raw_start)?;

        Ok(LoanTerms {
            monthly_payment_amount,
            debit_start_date,
            schedule_type: payload.schedule_type,
            payment_due_date: payload.payment_due_date,
            debit_day_of_week: payload.debit_day_of_week,
        })
    }
}

// ---------------------------------------------------------------------------
// Request / response envelopes
// ---------------------------------------------------------------------------

/// Body of a next-debit request: `{"loan": {...}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextDebitRequest {
    #[serde(default)]
    pub loan: Option<LoanPayload>,
}

impl NextDebitRequest {
    pub fn from_json(body: &str) -> DebitScheduleResult<Self> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn from_value(body: serde_json::Value) -> DebitScheduleResult<Self> {
        Ok(serde_json::from_value(body)?)
    }

    /// Validate the embedded loan object.
    pub fn loan_terms(self) -> DebitScheduleResult<LoanTerms> {
        let payload = self
            .loan
            .ok_or_else(|| DebitScheduleError::MissingField("loan".into()))?;
        LoanTerms::try_from(payload)
    }
}

/// Body of a next-debit response: `{"debit": {"amount": .., "date": ".."}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextDebitResponse {
    pub debit: DebitRecord,
}

impl NextDebitResponse {
    pub fn to_json(&self) -> DebitScheduleResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
