//! The filters and sort order of the transactions page.

use serde::Deserialize;
use time::Date;

use crate::{
    filter::{DateRange, matches_search, optional_date, optional_text},
    transaction::core::{Transaction, TransactionKind},
};

/// The kinds of transaction to show.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Expense,
    Income,
}

impl KindFilter {
    pub const ALL: [KindFilter; 3] = [KindFilter::All, KindFilter::Expense, KindFilter::Income];

    pub fn as_str(self) -> &'static str {
        match self {
            KindFilter::All => "all",
            KindFilter::Expense => "expense",
            KindFilter::Income => "income",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KindFilter::All => "All Types",
            KindFilter::Expense => "Expenses",
            KindFilter::Income => "Income",
        }
    }

    fn matches(self, kind: TransactionKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Expense => kind == TransactionKind::Expense,
            KindFilter::Income => kind == TransactionKind::Income,
        }
    }
}

/// The order to sort transactions by date.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SortOrder {
    /// Oldest first.
    #[serde(rename = "asc")]
    Ascending,
    /// Newest first.
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Ascending => "Oldest First",
            SortOrder::Descending => "Newest First",
        }
    }
}

/// The query string of the transactions page. Missing values mean "no filter".
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct TransactionFilter {
    #[serde(default)]
    pub kind: KindFilter,
    #[serde(default, deserialize_with = "optional_text")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "optional_date")]
    pub start_date: Option<Date>,
    #[serde(default, deserialize_with = "optional_date")]
    pub end_date: Option<Date>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl TransactionFilter {
    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    /// Whether any filter is set. The sort order is not a filter.
    pub fn is_active(&self) -> bool {
        self.kind != KindFilter::All
            || self.search.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        let search = self.search.as_deref().unwrap_or_default();

        self.kind.matches(transaction.kind)
            && matches_search(search, [transaction.label.as_str(), transaction.note()])
            && self.date_range().contains(transaction.date)
    }

    /// The matching transactions in the requested order.
    ///
    /// Transactions on the same day keep their relative order.
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        let mut filtered: Vec<&Transaction> = transactions
            .iter()
            .filter(|transaction| self.matches(transaction))
            .collect();

        match self.sort {
            SortOrder::Ascending => filtered.sort_by_key(|transaction| transaction.date),
            SortOrder::Descending => filtered.sort_by(|a, b| b.date.cmp(&a.date)),
        }

        filtered
    }
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use crate::transaction::core::{Transaction, TransactionKind};

    use super::{KindFilter, SortOrder, TransactionFilter};

    fn transaction(id: &str, kind: TransactionKind, label: &str, date: Date) -> Transaction {
        Transaction {
            id: id.to_owned(),
            kind,
            amount: 10.0,
            label: label.to_owned(),
            note: None,
            date,
        }
    }

    fn transactions() -> Vec<Transaction> {
        vec![
            transaction("e2", TransactionKind::Expense, "Rent", date!(2025 - 04 - 01)),
            transaction("i1", TransactionKind::Income, "Salary", date!(2025 - 03 - 28)),
            transaction("e1", TransactionKind::Expense, "Food", date!(2025 - 03 - 15)),
        ]
    }

    fn ids(filtered: Vec<&Transaction>) -> Vec<&str> {
        filtered.into_iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn defaults_to_newest_first_without_filters() {
        let transactions = transactions();
        let filter = TransactionFilter::default();

        assert!(!filter.is_active());
        assert_eq!(ids(filter.apply(&transactions)), ["e2", "i1", "e1"]);
    }

    #[test]
    fn ascending_sort_is_not_a_filter() {
        let transactions = transactions();
        let filter = TransactionFilter {
            sort: SortOrder::Ascending,
            ..Default::default()
        };

        assert!(!filter.is_active());
        assert_eq!(ids(filter.apply(&transactions)), ["e1", "i1", "e2"]);
    }

    #[test]
    fn filters_by_kind() {
        let transactions = transactions();
        let expenses = TransactionFilter {
            kind: KindFilter::Expense,
            ..Default::default()
        };
        let incomes = TransactionFilter {
            kind: KindFilter::Income,
            ..Default::default()
        };

        assert_eq!(ids(expenses.apply(&transactions)), ["e2", "e1"]);
        assert_eq!(ids(incomes.apply(&transactions)), ["i1"]);
    }

    #[test]
    fn search_and_dates_combine() {
        let transactions = transactions();
        let filter = TransactionFilter {
            search: Some("r".to_owned()),
            start_date: Some(date!(2025 - 03 - 16)),
            end_date: Some(date!(2025 - 04 - 01)),
            ..Default::default()
        };

        assert_eq!(ids(filter.apply(&transactions)), ["e2", "i1"]);
    }

    #[test]
    fn parses_query_string() {
        let filter: TransactionFilter =
            serde_urlencoded::from_str("kind=income&search=&start_date=&end_date=2025-01-31&sort=asc")
                .unwrap();

        assert_eq!(
            filter,
            TransactionFilter {
                kind: KindFilter::Income,
                search: None,
                start_date: None,
                end_date: Some(date!(2025 - 01 - 31)),
                sort: SortOrder::Ascending,
            }
        );
    }
}
