//! Domain model for a single day's logged distance. The type stays a plain
//! data holder so the store can focus on ordering and merging while the UI
//! focuses on presentation.

use std::fmt;

use chrono::NaiveDate;

/// ISO calendar-day format used when a record's date crosses a text boundary.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
/// Total distance covered on one calendar day.
pub struct Record {
    /// Calendar day the distance belongs to. Unique within a store, so it
    /// doubles as the record's identity.
    pub date: NaiveDate,
    /// Kilometres covered that day. Never negative.
    pub distance: f64,
}

impl Record {
    pub fn new(date: NaiveDate, distance: f64) -> Self {
        Self { date, distance }
    }

    /// Parse the `YYYY-MM-DD` form of a date, the shape every caller hands in.
    pub fn parse_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(raw.trim(), ISO_DATE_FORMAT)
    }

    /// The record's date rendered back as `YYYY-MM-DD`.
    pub fn iso_date(&self) -> String {
        self.date.format(ISO_DATE_FORMAT).to_string()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} km", self.iso_date(), self.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_iso_form() {
        let date = Record::parse_date(" 2024-03-01 ").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_other_forms() {
        assert!(Record::parse_date("01.03.2024").is_err());
        assert!(Record::parse_date("2024-02-30").is_err());
        assert!(Record::parse_date("").is_err());
    }

    #[test]
    fn test_display_uses_iso_date() {
        let record = Record::new(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), 3.0);
        assert_eq!(record.iso_date(), "2024-03-05");
        assert_eq!(record.to_string(), "2024-03-05: 3 km");
    }
}
