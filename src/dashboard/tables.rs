//! The top categories and recent transactions lists on the dashboard.

use maud::{Markup, html};
use time::{Date, macros::format_description};

use crate::{
    currency::format_amount,
    endpoints,
    html::{
        BADGE_STYLE, CARD_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        delete_button, empty_state, note_cell, progress_bar,
    },
    transaction::{Transaction, TransactionKind},
};

fn format_transaction_date(date: Date) -> String {
    date.format(format_description!("[month repr:short] [day], [year]"))
        .unwrap_or_else(|_| date.to_string())
}

fn share_of(amount: f64, total: f64) -> f64 {
    if total > 0.0 { amount / total * 100.0 } else { 0.0 }
}

/// This month's biggest spending categories with their share of the month's expenses.
pub(super) fn top_categories_view(
    top_categories: &[(String, f64)],
    monthly_expenses: f64,
    currency: &str,
) -> Markup {
    html! {
        section id="top-categories" class=(CARD_STYLE)
        {
            h2 class="mb-4 text-xl font-semibold" { "Top Spending Categories" }

            @if top_categories.is_empty() {
                (empty_state("No spending this month", "Expenses you add this month will appear here."))
            } @else {
                ul class="space-y-4"
                {
                    @for (name, amount) in top_categories {
                        li
                        {
                            div class="flex justify-between mb-1 text-sm"
                            {
                                span class="font-medium" { (name) }
                                span class="tabular-nums" { (format_amount(*amount, currency)) }
                            }
                            (progress_bar(share_of(*amount, monthly_expenses), "bg-blue-600"))
                        }
                    }
                }
            }
        }
    }
}

fn recent_transaction_row(transaction: &Transaction, currency: &str) -> Markup {
    let (sign, amount_style, noun) = match transaction.kind {
        TransactionKind::Expense => ("-", "text-red-600 dark:text-red-400", "expense"),
        TransactionKind::Income => ("+", "text-green-600 dark:text-green-400", "income"),
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-kind=(transaction.kind.as_str())
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.date) { (format_transaction_date(transaction.date)) }
            }
            td class=(TABLE_CELL_STYLE) { span class=(BADGE_STYLE) { (transaction.label) } }
            (note_cell(transaction.note()))
            td class={"px-6 py-4 text-right tabular-nums " (amount_style)}
            {
                (sign) (format_amount(transaction.amount, currency))
            }
            td class=(TABLE_CELL_STYLE)
            {
                (delete_button(
                    &transaction.delete_url(),
                    &format!("Are you sure you want to delete this {noun}? This cannot be undone."),
                    "closest tr",
                ))
            }
        }
    }
}

pub(super) fn recent_transactions_view(transactions: &[Transaction], currency: &str) -> Markup {
    html! {
        section id="recent-transactions" class={ (CARD_STYLE) " overflow-x-auto" }
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h2 class="text-xl font-semibold" { "Recent Transactions" }
                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "View all" }
            }

            @if transactions.is_empty() {
                (empty_state("No transactions found", "Add an expense or income to get started."))
            } @else {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Note" }
                            th scope="col" class="px-6 py-4 text-right" { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                        }
                    }
                    tbody
                    {
                        @for transaction in transactions {
                            (recent_transaction_row(transaction, currency))
                        }
                    }
                }
            }
        }
    }
}
