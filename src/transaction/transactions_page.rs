//! Displays expenses and incomes in a single filterable list.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::{Date, macros::format_description};

use crate::{
    Error,
    api::{ApiClient, AuthToken},
    currency::{currency_symbol, format_amount},
    endpoints,
    html::{
        BADGE_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, currency_input_styles, date_filter_input, delete_button, empty_state, note_cell, pluralise,
    },
    navigation::NavBar,
    profile::get_currency_or_default,
    transaction::{
        core::{Transaction, TransactionKind, get_transactions},
        query::{KindFilter, SortOrder, TransactionFilter},
    },
};

/// "Mar 05, 2025".
fn format_filter_date(date: Date) -> String {
    date.format(format_description!("[month repr:short] [day], [year]"))
        .unwrap_or_else(|_| date.to_string())
}

fn active_filters(filter: &TransactionFilter) -> Markup {
    html! {
        div class="mt-4 flex flex-wrap items-center gap-2 text-sm"
        {
            span class="text-gray-500 dark:text-gray-400" { "Active filters:" }

            @if filter.kind != KindFilter::All {
                span class=(BADGE_STYLE) { "Type: " (filter.kind.label()) }
            }
            @if let Some(start_date) = filter.start_date {
                span class=(BADGE_STYLE) { "From: " (format_filter_date(start_date)) }
            }
            @if let Some(end_date) = filter.end_date {
                span class=(BADGE_STYLE) { "To: " (format_filter_date(end_date)) }
            }
            @if let Some(search) = &filter.search {
                span class=(BADGE_STYLE) { "Search: \"" (search) "\"" }
            }

            a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Reset" }
        }
    }
}

fn filter_form(filter: &TransactionFilter) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            h2 class="mb-4 text-lg font-semibold" { "Transaction Filters" }

            form method="get" action=(endpoints::TRANSACTIONS_VIEW) class="grid gap-4 sm:grid-cols-2 lg:grid-cols-5"
            {
                div class="flex flex-col gap-1"
                {
                    label for="kind" class=(FORM_LABEL_STYLE) { "Type" }
                    select name="kind" id="kind" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for kind in KindFilter::ALL {
                            option value=(kind.as_str()) selected[kind == filter.kind] { (kind.label()) }
                        }
                    }
                }

                (date_filter_input("Start Date", "start_date", filter.start_date))
                (date_filter_input("End Date", "end_date", filter.end_date))

                div class="flex flex-col gap-1"
                {
                    label for="search" class=(FORM_LABEL_STYLE) { "Search" }
                    input
                        type="search"
                        name="search"
                        id="search"
                        placeholder="Search transactions..."
                        value=[filter.search.as_deref()]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="flex flex-col gap-1"
                {
                    label for="sort" class=(FORM_LABEL_STYLE) { "Sort Order" }
                    select name="sort" id="sort" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for sort in [SortOrder::Descending, SortOrder::Ascending] {
                            option value=(sort.as_str()) selected[sort == filter.sort] { (sort.label()) }
                        }
                    }
                }

                div class="lg:col-span-5"
                {
                    button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Apply filters" }
                }
            }

            @if filter.is_active() {
                (active_filters(filter))
            }
        }
    }
}

fn transaction_row(transaction: &Transaction, currency: &str) -> Markup {
    let (sign, amount_style, noun) = match transaction.kind {
        TransactionKind::Expense => ("-", "text-red-600 dark:text-red-400", "expense"),
        TransactionKind::Income => ("+", "text-green-600 dark:text-green-400", "income"),
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-kind=(transaction.kind.as_str())
        {
            td class=(TABLE_CELL_STYLE) { time datetime=(transaction.date) { (transaction.date) } }
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

fn transactions_table(
    transactions: &[Transaction],
    filtered: &[&Transaction],
    currency: &str,
) -> Markup {
    html! {
        section class="w-full overflow-x-auto"
        {
            p class="mb-2 text-sm text-gray-500 dark:text-gray-400"
            {
                (pluralise(filtered.len(), "transaction")) " shown"
            }

            @if filtered.is_empty() {
                @if transactions.is_empty() {
                    (empty_state("No transactions yet", "Add an expense or income to see it here."))
                } @else {
                    (empty_state("No matching transactions", "Try changing or resetting the filters."))
                }
            } @else {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category / Source" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Note" }
                            th scope="col" class="px-6 py-3 text-right" { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for transaction in filtered {
                            (transaction_row(transaction, currency))
                        }
                    }
                }
            }
        }
    }
}

fn transactions_view(
    transactions: &[Transaction],
    filter: &TransactionFilter,
    currency: &str,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let filtered = filter.apply(transactions);

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-6xl space-y-6"
            {
                header
                {
                    h1 class="text-xl font-bold" { "Transactions" }
                    p class="text-sm text-gray-500 dark:text-gray-400" { "View and manage all your expenses and income" }
                }

                (filter_form(filter))
                (transactions_table(transactions, &filtered, currency))
            }
        }
    };

    base(
        "Transactions",
        &[currency_input_styles(currency_symbol(currency))],
        &content,
    )
}

/// Renders the transactions page, applying the filters in the query string.
pub async fn get_transactions_page(
    State(api): State<ApiClient>,
    Extension(token): Extension<AuthToken>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Response, Error> {
    let (transactions, currency) = tokio::join!(
        get_transactions(&api, &token),
        get_currency_or_default(&api, &token),
    );
    let transactions = transactions.inspect_err(|error| {
        tracing::error!("Could not fetch transactions: {error}");
    })?;

    Ok(transactions_view(&transactions, &filter, &currency).into_response())
}
