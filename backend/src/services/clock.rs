use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

/// Format of every calendar date on the wire and in the store
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of "today" for completion stamps and rollover targets.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    fn yesterday(&self) -> NaiveDate {
        let today = self.today();
        today.pred_opt().unwrap_or(today)
    }
}

/// Resolves dates in a fixed display timezone.
#[derive(Debug, Clone, Copy)]
pub struct ZonedClock {
    tz: Tz,
}

impl ZonedClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Clock for ZonedClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a strict ten-character `YYYY-MM-DD` date. Stored dates compare as text.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Clock pinned to a date that tests can move.
#[cfg(test)]
pub struct FixedClock {
    today: std::sync::Mutex<NaiveDate>,
}

#[cfg(test)]
impl FixedClock {
    pub fn new(today: &str) -> Self {
        Self {
            today: std::sync::Mutex::new(parse_date(today).unwrap()),
        }
    }

    pub fn set(&self, today: &str) {
        *self.today.lock().unwrap() = parse_date(today).unwrap();
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap()
    }
}
