//! Summary figures for the dashboard, computed from the user's expenses and incomes.

use time::{Date, Month};

use crate::{
    expense::Expense,
    filter::{DateRange, totals_by_label},
    income::Income,
    transaction::{Transaction, merge_transactions},
};

/// The number of months shown in the trend charts.
pub(super) const TREND_MONTHS: usize = 6;
/// The number of categories listed under top categories.
pub(super) const TOP_CATEGORY_COUNT: usize = 5;
/// The number of transactions listed under recent transactions.
pub(super) const RECENT_TRANSACTION_COUNT: usize = 5;

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct MonthlyTotals {
    /// The three-letter month name, e.g. "Jan".
    pub label: &'static str,
    pub income: f64,
    pub expenses: f64,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct DashboardSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    /// This month's income minus this month's expenses.
    pub current_balance: f64,
    /// Savings as a percentage of this month's income, 0 without income.
    pub savings_rate: f64,
    pub monthly_budget: f64,
    /// This month's expenses as a percentage of the budget, at most 100.
    pub budget_utilisation: f64,
    /// This month's expenses by category, largest first.
    pub category_breakdown: Vec<(String, f64)>,
    /// The last [TREND_MONTHS] months, oldest first.
    pub trends: Vec<MonthlyTotals>,
    pub recent_transactions: Vec<Transaction>,
}

impl DashboardSummary {
    pub fn savings(&self) -> f64 {
        self.current_balance
    }

    /// The [TOP_CATEGORY_COUNT] categories with the largest spending this month.
    pub fn top_categories(&self) -> &[(String, f64)] {
        let count = self.category_breakdown.len().min(TOP_CATEGORY_COUNT);
        &self.category_breakdown[..count]
    }

    pub fn has_data(&self) -> bool {
        !self.recent_transactions.is_empty()
    }
}

pub(super) fn month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

fn sum_in(amounts: impl IntoIterator<Item = (Date, f64)>, range: &DateRange) -> f64 {
    amounts
        .into_iter()
        .filter(|(date, _)| range.contains(*date))
        .map(|(_, amount)| amount)
        .sum()
}

/// The month containing `today` and the `count - 1` months before it, oldest first.
fn trailing_months(today: Date, count: usize) -> Vec<(Month, DateRange)> {
    let mut months = Vec::with_capacity(count);
    let mut range = DateRange::month_of(today);

    for _ in 0..count {
        let Some(start) = range.start else { break };
        months.push((start.month(), range));
        range = DateRange::previous_month_of(start);
    }

    months.reverse();
    months
}

/// Compute the dashboard figures as of `today`.
pub(super) fn summarise(
    expenses: &[Expense],
    incomes: &[Income],
    monthly_budget: f64,
    today: Date,
) -> DashboardSummary {
    let expense_amounts = || expenses.iter().map(|expense| (expense.date, expense.amount));
    let income_amounts = || incomes.iter().map(|income| (income.date, income.amount));

    let this_month = DateRange::month_of(today);
    let monthly_income = sum_in(income_amounts(), &this_month);
    let monthly_expenses = sum_in(expense_amounts(), &this_month);
    let current_balance = monthly_income - monthly_expenses;

    let savings_rate = if monthly_income > 0.0 {
        current_balance / monthly_income * 100.0
    } else {
        0.0
    };
    let budget_utilisation = if monthly_budget > 0.0 {
        (monthly_expenses / monthly_budget * 100.0).min(100.0)
    } else {
        0.0
    };

    let category_breakdown = totals_by_label(
        expenses
            .iter()
            .filter(|expense| this_month.contains(expense.date))
            .map(|expense| (expense.category_name(), expense.amount)),
    );

    let trends = trailing_months(today, TREND_MONTHS)
        .into_iter()
        .map(|(month, range)| MonthlyTotals {
            label: month_abbreviation(month),
            income: sum_in(income_amounts(), &range),
            expenses: sum_in(expense_amounts(), &range),
        })
        .collect();

    let mut recent_transactions = merge_transactions(expenses, incomes);
    recent_transactions.truncate(RECENT_TRANSACTION_COUNT);

    DashboardSummary {
        total_income: income_amounts().map(|(_, amount)| amount).sum(),
        total_expenses: expense_amounts().map(|(_, amount)| amount).sum(),
        monthly_income,
        monthly_expenses,
        current_balance,
        savings_rate,
        monthly_budget,
        budget_utilisation,
        category_breakdown,
        trends,
        recent_transactions,
    }
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use crate::{
        expense::{CategoryRef, Expense},
        income::Income,
    };

    use super::summarise;

    fn expense(amount: f64, category: &str, date: Date) -> Expense {
        Expense {
            id: format!("e-{date}-{amount}"),
            amount,
            category: Some(CategoryRef::Name(category.to_owned())),
            subcategory: None,
            note: None,
            date,
            payment_method: None,
        }
    }

    fn income(amount: f64, date: Date) -> Income {
        Income {
            id: format!("i-{date}-{amount}"),
            amount,
            source: "Salary".to_owned(),
            note: None,
            date,
        }
    }

    const TODAY: Date = date!(2025 - 03 - 15);

    #[test]
    fn monthly_figures_only_count_this_month() {
        let expenses = [
            expense(100.0, "Food", date!(2025 - 03 - 01)),
            expense(50.0, "Transport", date!(2025 - 03 - 31)),
            expense(500.0, "Rent", date!(2025 - 02 - 28)),
        ];
        let incomes = [income(600.0, date!(2025 - 03 - 10)), income(900.0, date!(2025 - 01 - 10))];

        let summary = summarise(&expenses, &incomes, 300.0, TODAY);

        assert_eq!(summary.total_expenses, 650.0);
        assert_eq!(summary.total_income, 1500.0);
        assert_eq!(summary.monthly_expenses, 150.0);
        assert_eq!(summary.monthly_income, 600.0);
        assert_eq!(summary.current_balance, 450.0);
        assert_eq!(summary.savings(), 450.0);
        assert_eq!(summary.savings_rate, 75.0);
        assert_eq!(summary.budget_utilisation, 50.0);
    }

    #[test]
    fn utilisation_is_capped_and_zero_without_budget() {
        let expenses = [expense(450.0, "Food", date!(2025 - 03 - 02))];

        let over = summarise(&expenses, &[], 300.0, TODAY);
        let no_budget = summarise(&expenses, &[], 0.0, TODAY);

        assert_eq!(over.budget_utilisation, 100.0);
        assert_eq!(no_budget.budget_utilisation, 0.0);
        assert_eq!(over.savings_rate, 0.0);
        assert_eq!(over.current_balance, -450.0);
    }

    #[test]
    fn top_categories_are_this_months_largest() {
        let expenses = [
            expense(10.0, "A", date!(2025 - 03 - 01)),
            expense(60.0, "B", date!(2025 - 03 - 02)),
            expense(30.0, "C", date!(2025 - 03 - 03)),
            expense(40.0, "D", date!(2025 - 03 - 04)),
            expense(20.0, "E", date!(2025 - 03 - 05)),
            expense(25.0, "A", date!(2025 - 03 - 06)),
            expense(5.0, "F", date!(2025 - 03 - 07)),
            expense(999.0, "Old", date!(2025 - 02 - 07)),
        ];

        let summary = summarise(&expenses, &[], 0.0, TODAY);

        let names: Vec<&str> = summary
            .top_categories()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, ["B", "D", "A", "C", "E"]);
        assert_eq!(summary.category_breakdown.len(), 6);
    }

    #[test]
    fn trends_cover_six_months_ending_this_month() {
        let expenses = [
            expense(10.0, "Food", date!(2024 - 10 - 31)),
            expense(20.0, "Food", date!(2025 - 01 - 15)),
            expense(99.0, "Food", date!(2024 - 09 - 30)),
        ];
        let incomes = [income(100.0, date!(2025 - 03 - 01))];

        let summary = summarise(&expenses, &incomes, 0.0, TODAY);

        let labels: Vec<&str> = summary.trends.iter().map(|month| month.label).collect();
        assert_eq!(labels, ["Oct", "Nov", "Dec", "Jan", "Feb", "Mar"]);
        let expenses: Vec<f64> = summary.trends.iter().map(|month| month.expenses).collect();
        assert_eq!(expenses, [10.0, 0.0, 0.0, 20.0, 0.0, 0.0]);
        assert_eq!(summary.trends[5].income, 100.0);
    }

    #[test]
    fn keeps_five_most_recent_transactions() {
        let expenses: Vec<Expense> = (1..=4)
            .map(|day| expense(day as f64, "Food", Date::from_calendar_date(2025, time::Month::March, day).unwrap()))
            .collect();
        let incomes = [income(5.0, date!(2025 - 03 - 10)), income(6.0, date!(2024 - 12 - 01))];

        let summary = summarise(&expenses, &incomes, 0.0, TODAY);

        let amounts: Vec<f64> = summary
            .recent_transactions
            .iter()
            .map(|transaction| transaction.amount)
            .collect();
        assert_eq!(amounts, [5.0, 4.0, 3.0, 2.0, 1.0]);
        assert!(summary.has_data());
    }
}
