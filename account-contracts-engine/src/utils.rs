use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use account_contracts_api::{ContractError, ContractResult};

/// Rounds half away from zero to `decimal_places`
pub fn round_half_up(amount: Decimal, decimal_places: u32) -> Decimal {
    amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

pub fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

pub fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    midnight(at.date_naive())
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    u32::try_from((next - first).num_days()).ok()
}

/// `day` of the given month, moved back to the last day when the month is shorter
pub fn clamped_date(year: i32, month: u32, day: u32) -> ContractResult<NaiveDate> {
    days_in_month(year, month)
        .and_then(|last| NaiveDate::from_ymd_opt(year, month, day.clamp(1, last)))
        .ok_or_else(|| ContractError::InvalidConfiguration(format!("No valid date for {year}-{month:02}-{day:02}")))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
