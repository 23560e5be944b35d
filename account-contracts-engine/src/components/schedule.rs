use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use rust_decimal::Decimal;

use account_contracts_api::{ContractError, ContractResult, ScheduleExpression};
use account_contracts_config::models::calendar::{DayCountConvention, Frequency, FrequencyPeriod, HolidayCalendarModel};
use account_contracts_config::models::product::{ScheduleTime, TermUnit};

use crate::utils::{clamped_date, first_of_month};

/// Next date strictly after `start` on `intended_day` of the period.
///
/// Month-based frequencies clamp the day to the end of short months. Monthly looks at the
/// current month first; longer periods start one full period out. Day-based frequencies
/// add a fixed number of days.
pub fn next_occurrence(start: NaiveDate, frequency: Frequency, intended_day: u32) -> ContractResult<NaiveDate> {
    match frequency.period() {
        FrequencyPeriod::Days(days) => start
            .checked_add_signed(Duration::days(days))
            .ok_or_else(|| out_of_range(start)),
        FrequencyPeriod::Months(months) => {
            let month_start = first_of_month(start);
            let mut offset = if frequency == Frequency::Monthly { 0 } else { months };
            loop {
                let month = month_start
                    .checked_add_months(Months::new(offset))
                    .ok_or_else(|| out_of_range(start))?;
                let candidate = clamped_date(month.year(), month.month(), intended_day)?;
                if candidate > start {
                    return Ok(candidate);
                }
                offset += months;
            }
        }
    }
}

fn out_of_range(start: NaiveDate) -> ContractError {
    ContractError::InvalidConfiguration(format!("Schedule from {start} is out of range"))
}

pub fn days_in_year(convention: DayCountConvention, date: NaiveDate) -> Decimal {
    match convention {
        DayCountConvention::Actual => {
            if NaiveDate::from_ymd_opt(date.year(), 2, 29).is_some() {
                Decimal::from(366)
            } else {
                Decimal::from(365)
            }
        }
        DayCountConvention::Days365 => Decimal::from(365),
        DayCountConvention::Days360 => Decimal::from(360),
    }
}

/// Share of a year one day represents under `convention`
pub fn day_count_fraction(convention: DayCountConvention, date: NaiveDate) -> Decimal {
    Decimal::ONE / days_in_year(convention, date)
}

/// End of a fixed term, moved past any holidays it lands on
pub fn maturity_date(
    start: NaiveDate,
    term: u32,
    unit: TermUnit,
    holidays: &HolidayCalendarModel,
) -> ContractResult<NaiveDate> {
    let mut maturity = match unit {
        TermUnit::Months => start.checked_add_months(Months::new(term)),
        TermUnit::Days => start.checked_add_signed(Duration::days(i64::from(term))),
    }
    .ok_or_else(|| out_of_range(start))?;

    while holidays.is_holiday(maturity) {
        maturity = maturity.succ_opt().ok_or_else(|| out_of_range(start))?;
    }
    Ok(maturity)
}

/// Next run of a periodic event after `after`, at the configured time of day
pub fn next_event_datetime(
    after: DateTime<Utc>,
    frequency: Frequency,
    intended_day: u32,
    time: ScheduleTime,
) -> ContractResult<DateTime<Utc>> {
    let date = next_occurrence(after.date_naive(), frequency, intended_day)?;
    time.on(date)
}

pub fn next_event_schedule(
    after: DateTime<Utc>,
    frequency: Frequency,
    intended_day: u32,
    time: ScheduleTime,
) -> ContractResult<ScheduleExpression> {
    next_event_datetime(after, frequency, intended_day, time).map(ScheduleExpression::at_datetime)
}
