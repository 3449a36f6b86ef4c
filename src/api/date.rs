//! Serde helpers for the date and number formats the API sends.

use serde::Deserialize;
use time::{
    Date, OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};

/// Calendar date format used on the wire, e.g. "2025-01-31".
pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a calendar date from either "YYYY-MM-DD" or a full RFC 3339
/// timestamp, in which case only the date part is kept.
pub fn parse_calendar_date(text: &str) -> Option<Date> {
    let date_part = text.trim().get(..10)?;

    Date::parse(date_part, DATE_FORMAT).ok()
}

/// (De)serialize a [Date] as "YYYY-MM-DD", accepting full timestamps on input.
pub mod calendar_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::{DATE_FORMAT, parse_calendar_date};

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date.format(DATE_FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse_calendar_date(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date \"{text}\"")))
    }
}

/// Deserialize an amount that may arrive as a JSON number or a numeric string.
pub mod lenient_amount {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    impl Amount {
        fn parse<E: serde::de::Error>(self) -> Result<f64, E> {
            match self {
                Amount::Number(number) => Ok(number),
                Amount::Text(text) => text
                    .trim()
                    .parse()
                    .map_err(|_| E::custom(format!("invalid amount \"{text}\""))),
            }
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Amount::deserialize(deserializer)?.parse()
    }

    /// Like [deserialize], reading `null` as zero.
    pub fn deserialize_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<Amount>::deserialize(deserializer)?
            .map_or(Ok(0.0), Amount::parse)
    }
}

/// A timestamp as serialized by Firestore, e.g. `{"_seconds": 1735603200, "_nanoseconds": 0}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FirestoreTimestamp {
    #[serde(rename = "_seconds")]
    pub seconds: i64,
    #[serde(rename = "_nanoseconds", default)]
    pub nanoseconds: i64,
}

impl FirestoreTimestamp {
    /// The timestamp as a date time, or `None` if it is out of range.
    pub fn to_date_time(self) -> Option<OffsetDateTime> {
        let nanos = i128::from(self.seconds) * 1_000_000_000 + i128::from(self.nanoseconds);

        OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
    }

    /// The calendar date of the timestamp in the timezone `offset`.
    pub fn to_local_date(self, offset: UtcOffset) -> Option<Date> {
        self.to_date_time()
            .map(|date_time| date_time.to_offset(offset).date())
    }
}
