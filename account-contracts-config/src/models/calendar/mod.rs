pub mod day_count;
pub mod frequency;
pub mod holiday_calendar;

pub use day_count::DayCountConvention;
pub use frequency::{Frequency, FrequencyPeriod};
pub use holiday_calendar::HolidayCalendarModel;
