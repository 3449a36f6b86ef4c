//! The filters on the income page.

use serde::Deserialize;
use time::Date;

use crate::{
    filter::{DateRange, matches_search, optional_date, optional_text},
    income::core::Income,
};

/// The query string of the income page. Missing values mean "no filter".
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct IncomeFilter {
    #[serde(default, deserialize_with = "optional_text")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "optional_date")]
    pub start_date: Option<Date>,
    #[serde(default, deserialize_with = "optional_date")]
    pub end_date: Option<Date>,
}

impl IncomeFilter {
    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    pub fn is_active(&self) -> bool {
        self.search.is_some() || self.start_date.is_some() || self.end_date.is_some()
    }

    pub fn matches(&self, income: &Income) -> bool {
        let search = self.search.as_deref().unwrap_or_default();

        matches_search(search, [income.source.as_str(), income.note()])
            && self.date_range().contains(income.date)
    }

    pub fn apply<'a>(&self, incomes: &'a [Income]) -> Vec<&'a Income> {
        incomes
            .iter()
            .filter(|income| self.matches(income))
            .collect()
    }
}
