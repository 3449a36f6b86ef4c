//! The filters on the expenses page.

use serde::Deserialize;
use time::Date;

use crate::{
    expense::core::Expense,
    filter::{DateRange, matches_search, optional_date, optional_text},
};

/// The category filter value that matches every category.
pub const ALL_CATEGORIES: &str = "all";

/// The query string of the expenses page. Missing values mean "no filter".
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct ExpenseFilter {
    #[serde(default, deserialize_with = "optional_text")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "optional_date")]
    pub start_date: Option<Date>,
    #[serde(default, deserialize_with = "optional_date")]
    pub end_date: Option<Date>,
}

impl ExpenseFilter {
    /// The category to filter by, `None` for all categories.
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|category| *category != ALL_CATEGORIES)
    }

    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    pub fn is_active(&self) -> bool {
        self.search.is_some()
            || self.category().is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        let search = self.search.as_deref().unwrap_or_default();

        matches_search(search, [expense.category_name(), expense.note()])
            && self
                .category()
                .is_none_or(|category| expense.category_name() == category)
            && self.date_range().contains(expense.date)
    }

    /// The expenses that pass every filter, in their original order.
    pub fn apply<'a>(&self, expenses: &'a [Expense]) -> Vec<&'a Expense> {
        expenses
            .iter()
            .filter(|expense| self.matches(expense))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use crate::expense::core::{CategoryRef, Expense};

    use super::ExpenseFilter;

    fn expense(id: &str, category: &str, note: &str, date: Date) -> Expense {
        Expense {
            id: id.to_owned(),
            amount: 10.0,
            category: Some(CategoryRef::Name(category.to_owned())),
            subcategory: None,
            note: Some(note.to_owned()),
            date,
            payment_method: None,
        }
    }

    fn expenses() -> Vec<Expense> {
        vec![
            expense("1", "Food", "Groceries", date!(2025 - 01 - 05)),
            expense("2", "Transport", "Bus pass", date!(2025 - 01 - 10)),
            expense("3", "Food", "Coffee with Sam", date!(2025 - 01 - 31)),
        ]
    }

    fn ids(filtered: Vec<&Expense>) -> Vec<&str> {
        filtered.into_iter().map(|expense| expense.id.as_str()).collect()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let expenses = expenses();
        let filter = ExpenseFilter::default();

        assert!(!filter.is_active());
        assert_eq!(ids(filter.apply(&expenses)), ["1", "2", "3"]);
    }

    #[test]
    fn search_matches_category_or_note() {
        let expenses = expenses();
        let by_note = ExpenseFilter {
            search: Some("coffee".to_owned()),
            ..Default::default()
        };
        let by_category = ExpenseFilter {
            search: Some("TRANS".to_owned()),
            ..Default::default()
        };

        assert_eq!(ids(by_note.apply(&expenses)), ["3"]);
        assert_eq!(ids(by_category.apply(&expenses)), ["2"]);
    }

    #[test]
    fn category_all_is_no_filter() {
        let expenses = expenses();
        let all = ExpenseFilter {
            category: Some("all".to_owned()),
            ..Default::default()
        };
        let food = ExpenseFilter {
            category: Some("Food".to_owned()),
            ..Default::default()
        };

        assert!(!all.is_active());
        assert_eq!(ids(all.apply(&expenses)), ["1", "2", "3"]);
        assert_eq!(ids(food.apply(&expenses)), ["1", "3"]);
    }

    #[test]
    fn date_range_includes_both_ends() {
        let expenses = expenses();
        let filter = ExpenseFilter {
            start_date: Some(date!(2025 - 01 - 10)),
            end_date: Some(date!(2025 - 01 - 31)),
            ..Default::default()
        };

        assert_eq!(ids(filter.apply(&expenses)), ["2", "3"]);
    }

    #[test]
    fn parses_query_string() {
        let filter: ExpenseFilter =
            serde_urlencoded::from_str("search=&category=Food&start_date=2025-01-01&end_date=")
                .unwrap();

        assert_eq!(
            filter,
            ExpenseFilter {
                search: None,
                category: Some("Food".to_owned()),
                start_date: Some(date!(2025 - 01 - 01)),
                end_date: None,
            }
        );
    }
}
