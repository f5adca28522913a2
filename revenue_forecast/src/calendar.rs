//! Quarter-end calendar arithmetic
//!
//! Every quarterly series is stamped with the last calendar day of its
//! quarter (31 Mar, 30 Jun, 30 Sep, 31 Dec).

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};

/// Last day of the quarter containing `date`
pub fn quarter_end(date: NaiveDate) -> Result<NaiveDate> {
    let quarter = date.month0() / 3;
    let (year, next_month) = if quarter == 3 {
        (date.year() + 1, 1)
    } else {
        (date.year(), quarter * 3 + 4)
    };

    NaiveDate::from_ymd_opt(year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .ok_or_else(|| out_of_range(date))
}

/// Last day of the quarter after the one containing `date`
pub fn next_quarter_end(date: NaiveDate) -> Result<NaiveDate> {
    let current = quarter_end(date)?;
    let next_start = current.succ_opt().ok_or_else(|| out_of_range(date))?;
    quarter_end(next_start)
}

/// `count` consecutive quarter ends, starting with the quarter containing `start`
pub fn quarter_ends(start: NaiveDate, count: usize) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(count);
    if count == 0 {
        return Ok(dates);
    }

    let mut current = quarter_end(start)?;
    dates.push(current);
    for _ in 1..count {
        current = next_quarter_end(current)?;
        dates.push(current);
    }

    Ok(dates)
}

/// `count` quarter ends strictly after the quarter containing `last`
pub fn following_quarter_ends(last: NaiveDate, count: usize) -> Result<Vec<NaiveDate>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    quarter_ends(next_quarter_end(last)?, count)
}

/// Short label such as `2024Q1`
pub fn quarter_label(date: NaiveDate) -> String {
    format!("{}Q{}", date.year(), date.month0() / 3 + 1)
}

fn out_of_range(date: NaiveDate) -> ForecastError {
    ForecastError::DataError(format!("Date {} is outside the supported calendar", date))
}
