//! The stat cards at the top of the dashboard.

use maud::{Markup, html};

use crate::{
    currency::format_amount,
    dashboard::aggregation::DashboardSummary,
    html::{CARD_STYLE, progress_bar, stat_card},
};

fn utilisation_fill(utilisation: f64) -> &'static str {
    if utilisation >= 90.0 {
        "bg-red-600"
    } else if utilisation >= 75.0 {
        "bg-yellow-400"
    } else {
        "bg-blue-600"
    }
}

/// Monthly income, expenses, balance and budget utilisation, followed by the all-time figures.
pub(super) fn summary_cards(summary: &DashboardSummary, currency: &str) -> Markup {
    html! {
        section id="summary-cards" class="grid gap-4 grid-cols-1 sm:grid-cols-2 lg:grid-cols-4"
        {
            (stat_card(
                "Monthly Income",
                &format_amount(summary.monthly_income, currency),
                "Total income this month",
            ))
            (stat_card(
                "Monthly Expenses",
                &format_amount(summary.monthly_expenses, currency),
                "Total expenses this month",
            ))
            (stat_card(
                "Current Balance",
                &format_amount(summary.current_balance, currency),
                "Available to spend",
            ))

            div id="budget-utilisation" class=(CARD_STYLE)
            {
                h3 class="text-sm font-medium text-gray-500 dark:text-gray-400" { "Budget Utilization" }
                p class="mt-2 text-2xl font-bold tabular-nums text-gray-900 dark:text-white"
                {
                    (format!("{:.0}%", summary.budget_utilisation))
                }
                p class="mt-1 mb-2 text-xs text-gray-500 dark:text-gray-400"
                {
                    "of " (format_amount(summary.monthly_budget, currency)) " budget"
                }
                (progress_bar(summary.budget_utilisation, utilisation_fill(summary.budget_utilisation)))
            }
        }

        section id="all-time-cards" class="grid gap-4 grid-cols-1 sm:grid-cols-3"
        {
            (stat_card(
                "Total Income",
                &format_amount(summary.total_income, currency),
                "All time",
            ))
            (stat_card(
                "Total Expenses",
                &format_amount(summary.total_expenses, currency),
                "All time",
            ))
            (stat_card(
                "Savings Rate",
                &format!("{:.1}%", summary.savings_rate),
                &format!("{} saved this month", format_amount(summary.savings(), currency)),
            ))
        }
    }
}
