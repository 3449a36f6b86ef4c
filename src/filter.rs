//! Filters and grouping shared by the expense, income and transaction lists.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use time::{Date, Month};

use crate::api::parse_calendar_date;

/// An inclusive date range where either end may be open.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<Date>,
    pub end: Option<Date>,
}

impl DateRange {
    /// Whether `date` lies within the range, counting both ends.
    pub fn contains(&self, date: Date) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }

    /// The calendar month that `date` falls in.
    pub fn month_of(date: Date) -> Self {
        let start = date.replace_day(1).ok();
        let (year, month) = match date.month() {
            Month::December => (date.year() + 1, Month::January),
            month => (date.year(), month.next()),
        };
        let end = Date::from_calendar_date(year, month, 1)
            .ok()
            .and_then(Date::previous_day);

        Self { start, end }
    }

    /// The calendar month before the one that `date` falls in.
    pub fn previous_month_of(date: Date) -> Self {
        match date.replace_day(1).ok().and_then(Date::previous_day) {
            Some(last_month) => Self::month_of(last_month),
            None => Self::default(),
        }
    }
}

/// Case-insensitive substring match of `query` against any of `fields`.
///
/// A blank query matches everything.
pub fn matches_search<'a>(query: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    let query = query.trim().to_lowercase();

    if query.is_empty() {
        return true;
    }

    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&query))
}

/// Sum `amount`s by label, largest total first.
///
/// Labels with equal totals are ordered by name so the output is stable.
pub fn totals_by_label<'a>(entries: impl IntoIterator<Item = (&'a str, f64)>) -> Vec<(String, f64)> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for (label, amount) in entries {
        *totals.entry(label).or_default() += amount;
    }

    let mut totals: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(label, total)| (label.to_owned(), total))
        .collect();
    totals.sort_by(|(a_label, a_total), (b_label, b_total)| {
        b_total.total_cmp(a_total).then_with(|| a_label.cmp(b_label))
    });

    totals
}

/// Deserialize an optional query string date, treating an empty or malformed value as no filter.
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;

    Ok(text.as_deref().map(str::trim).and_then(|text| {
        if text.is_empty() {
            None
        } else {
            parse_calendar_date(text)
        }
    }))
}

/// Deserialize an optional query string value, treating an empty value as missing.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;

    Ok(text
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty()))
}
