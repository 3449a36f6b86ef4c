//! Displays the user's expenses with filters, totals and a form for adding expenses.

use std::collections::BTreeSet;

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, Error,
    api::{ApiClient, AuthToken},
    currency::{currency_symbol, format_amount},
    endpoints::{self, format_endpoint},
    expense::{
        core::{Category, Expense, get_categories, get_expenses},
        query::{ALL_CATEGORIES, ExpenseFilter},
    },
    filter::{DateRange, totals_by_label},
    html::{
        BADGE_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, currency_input_styles, date_filter_input, delete_button, empty_state, note_cell, pluralise,
        progress_bar, stat_card, submit_button,
    },
    navigation::NavBar,
    profile::get_currency_or_default,
    timezone::local_today,
};

/// The state needed for the expenses page.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    pub api: ApiClient,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

struct ExpensesPageData<'a> {
    expenses: &'a [Expense],
    filtered: Vec<&'a Expense>,
    categories: &'a [Category],
    filter: &'a ExpenseFilter,
    currency: &'a str,
    today: Date,
}

fn sum<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> f64 {
    expenses.into_iter().map(|expense| expense.amount).sum()
}

fn total_in(expenses: &[Expense], range: DateRange) -> f64 {
    sum(expenses.iter().filter(|expense| range.contains(expense.date)))
}

fn summary_cards(data: &ExpensesPageData) -> Markup {
    let current_month = total_in(data.expenses, DateRange::month_of(data.today));
    let previous_month = total_in(data.expenses, DateRange::previous_month_of(data.today));
    let filtered_total = sum(data.filtered.iter().copied());
    let all_time = sum(data.expenses);

    html! {
        div class="grid w-full gap-4 grid-cols-1 sm:grid-cols-2 lg:grid-cols-4"
        {
            (stat_card("Current Month", &format_amount(current_month, data.currency), "Total spending this month"))
            (stat_card("Previous Month", &format_amount(previous_month, data.currency), "Total spending last month"))
            (stat_card(
                "Filtered Total",
                &format_amount(filtered_total, data.currency),
                &format!("{} shown", pluralise(data.filtered.len(), "expense"))
            ))
            (stat_card(
                "All Time",
                &format_amount(all_time, data.currency),
                &format!("{} total", pluralise(data.expenses.len(), "expense"))
            ))
        }
    }
}

/// The subcategory picker, listing the subcategories of the selected category.
///
/// Swapped in by the category picker whenever the category changes.
pub(super) fn subcategory_select(subcategories: &[String]) -> Markup {
    html! {
        select
            name="subcategory"
            id="subcategory"
            disabled[subcategories.is_empty()]
            class=(FORM_TEXT_INPUT_STYLE)
        {
            option value="" { "None" }
            @for subcategory in subcategories {
                option value=(subcategory) { (subcategory) }
            }
        }
    }
}

fn new_expense_form(categories: &[Category], today: Date) -> Markup {
    html! {
        details class=(CARD_STYLE)
        {
            summary class="cursor-pointer text-lg font-semibold" { "Add Expense" }

            form
                hx-post=(endpoints::EXPENSES_API)
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="mt-4 grid gap-4 sm:grid-cols-2"
            {
                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                    div class="input-wrapper w-full"
                    {
                        input
                            type="number"
                            name="amount"
                            id="amount"
                            step="0.01"
                            min="0.01"
                            placeholder="0.00"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                    input
                        type="date"
                        name="date"
                        id="date"
                        value=(today)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                    select
                        name="category"
                        id="category"
                        required
                        hx-get=(endpoints::EXPENSE_SUBCATEGORIES)
                        hx-trigger="change"
                        hx-target="#subcategory"
                        hx-swap="outerHTML"
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" { "Select a category" }
                        @for category in categories {
                            option value=(category.id) { (category.name) }
                        }
                    }
                }

                div
                {
                    label for="subcategory" class=(FORM_LABEL_STYLE) { "Subcategory" }
                    (subcategory_select(&[]))
                }

                div class="sm:col-span-2"
                {
                    label for="note" class=(FORM_LABEL_STYLE) { "Note" }
                    input
                        type="text"
                        name="note"
                        id="note"
                        placeholder="Add a note..."
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="sm:col-span-2"
                {
                    (submit_button("Add Expense"))
                }
            }
        }
    }
}

fn filter_form(data: &ExpensesPageData) -> Markup {
    let filter = data.filter;
    let selected = filter.category().unwrap_or(ALL_CATEGORIES);
    let category_names: BTreeSet<&str> = data
        .categories
        .iter()
        .map(|category| category.name.as_str())
        .chain(data.expenses.iter().map(Expense::category_name))
        .collect();

    html! {
        section class=(CARD_STYLE)
        {
            h2 class="text-lg font-semibold" { "Expense Filters" }
            p class="mb-4 text-sm text-gray-500 dark:text-gray-400"
            {
                "Filter your expenses by category, date range, or search for specific notes"
            }

            form method="get" action=(endpoints::EXPENSES_VIEW) class="grid gap-4 sm:grid-cols-2 lg:grid-cols-4"
            {
                div class="flex flex-col gap-1"
                {
                    label for="filter-category" class=(FORM_LABEL_STYLE) { "Category" }
                    select name="category" id="filter-category" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value=(ALL_CATEGORIES) selected[selected == ALL_CATEGORIES] { "All Categories" }
                        @for name in &category_names {
                            option value=(name) selected[*name == selected] { (name) }
                        }
                    }
                }

                (date_filter_input("Start Date", "start_date", filter.start_date))
                (date_filter_input("End Date", "end_date", filter.end_date))

                div class="flex flex-col gap-1"
                {
                    label for="search" class=(FORM_LABEL_STYLE) { "Search Notes" }
                    input
                        type="search"
                        name="search"
                        id="search"
                        placeholder="Search by note..."
                        value=[filter.search.as_deref()]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="flex items-center gap-4 lg:col-span-4"
                {
                    button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Apply filters" }

                    @if filter.is_active() {
                        a href=(endpoints::EXPENSES_VIEW) class=(LINK_STYLE) { "Reset" }
                    }
                }
            }
        }
    }
}

fn category_breakdown(data: &ExpensesPageData) -> Markup {
    let totals = totals_by_label(
        data.filtered
            .iter()
            .map(|expense| (expense.category_name(), expense.amount)),
    );
    let grand_total: f64 = totals.iter().map(|(_, total)| total).sum();

    html! {
        section class=(CARD_STYLE)
        {
            h2 class="mb-4 text-lg font-semibold" { "By Category" }

            @if totals.is_empty() {
                p class="text-sm text-gray-500 dark:text-gray-400" { "No expenses to break down." }
            }

            ul class="space-y-3"
            {
                @for (category, total) in &totals {
                    @let share = if grand_total > 0.0 { total / grand_total * 100.0 } else { 0.0 };
                    li
                    {
                        div class="flex justify-between text-sm"
                        {
                            span { (category) }
                            span class="tabular-nums" { (format_amount(*total, data.currency)) " (" (format!("{share:.0}")) "%)" }
                        }
                        (progress_bar(share, "bg-blue-600"))
                    }
                }
            }
        }
    }
}

fn expenses_table(data: &ExpensesPageData) -> Markup {
    let table_row = |expense: &Expense| {
        let delete_url = format_endpoint(endpoints::DELETE_EXPENSE, &expense.id);

        html! {
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { time datetime=(expense.date) { (expense.date) } }
                td class=(TABLE_CELL_STYLE)
                {
                    span class=(BADGE_STYLE) { (expense.category_name()) }
                    @if let Some(subcategory) = expense.subcategory.as_deref().filter(|subcategory| !subcategory.is_empty()) {
                        span class="ms-2 text-xs text-gray-500 dark:text-gray-400" { (subcategory) }
                    }
                }
                (note_cell(expense.note()))
                td class="px-6 py-4 text-right tabular-nums text-red-600 dark:text-red-400"
                {
                    "-" (format_amount(expense.amount, data.currency))
                }
                td class=(TABLE_CELL_STYLE)
                {
                    (delete_button(
                        &delete_url,
                        "Are you sure you want to delete this expense? This cannot be undone.",
                        "closest tr",
                    ))
                }
            }
        }
    };

    html! {
        section class="w-full overflow-x-auto"
        {
            @if data.filtered.is_empty() {
                @if data.expenses.is_empty() {
                    (empty_state("No expenses yet", "Add your first expense to start tracking your spending."))
                } @else {
                    (empty_state("No matching expenses", "Try changing or resetting the filters."))
                }
            } @else {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Note" }
                            th scope="col" class="px-6 py-3 text-right" { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for expense in &data.filtered {
                            (table_row(expense))
                        }
                    }
                }
            }
        }
    }
}

fn expenses_view(data: &ExpensesPageData) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-6xl space-y-6"
            {
                header
                {
                    h1 class="text-xl font-bold" { "Expenses" }
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Track and manage your spending" }
                }

                (summary_cards(data))
                (new_expense_form(data.categories, data.today))
                (filter_form(data))

                div class="grid gap-6 lg:grid-cols-3"
                {
                    div class="lg:col-span-2" { (expenses_table(data)) }
                    (category_breakdown(data))
                }
            }
        }
    };

    base(
        "Expenses",
        &[currency_input_styles(currency_symbol(data.currency))],
        &content,
    )
}

/// Renders the expenses page, applying the filters in the query string.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Extension(token): Extension<AuthToken>,
    Query(filter): Query<ExpenseFilter>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let (expenses, categories, currency) = tokio::join!(
        get_expenses(&state.api, &token),
        get_categories(&state.api, &token),
        get_currency_or_default(&state.api, &token),
    );
    let expenses = expenses.inspect_err(|error| {
        tracing::error!("Could not fetch expenses: {error}");
    })?;
    let categories = categories.unwrap_or_else(|error| {
        tracing::error!("Could not fetch categories: {error}");
        Vec::new()
    });

    let data = ExpensesPageData {
        filtered: filter.apply(&expenses),
        expenses: &expenses,
        categories: &categories,
        filter: &filter,
        currency: &currency,
        today,
    };

    Ok(expenses_view(&data).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension, Json, Router,
        extract::{Query, State},
        http::StatusCode,
        routing::get,
    };
    use scraper::{ElementRef, Html, Selector};
    use serde_json::json;

    use crate::{
        Error, endpoints,
        expense::query::ExpenseFilter,
        test_utils::{
            assert_hx_endpoint, assert_valid_html, get_test_app_state_with_stub,
            parse_html_document, test_token,
        },
    };

    use super::{ExpensesPageState, get_expenses_page};

    fn stub_api() -> Router {
        Router::new()
            .route(
                "/expenses",
                get(|| async {
                    Json(json!({ "expenses": [
                        { "id": "e1", "amount": 12.5, "category": { "id": "c1", "name": "Food" }, "note": "Lunch", "date": "2024-03-02" },
                        { "id": "e2", "amount": 100, "category": "Rent", "date": "2024-03-01" },
                        { "id": "e3", "amount": "7.25", "category": "Food", "note": "Coffee", "date": "2024-02-20" }
                    ]}))
                }),
            )
            .route(
                "/categories",
                get(|| async {
                    Json(json!({ "categories": [
                        { "id": "c1", "name": "Food", "subcategories": ["Groceries", "Dining"] },
                        { "id": "c2", "name": "Rent" }
                    ]}))
                }),
            )
            .route(
                "/profile",
                get(|| async { Json(json!({ "data": { "currency": "GBP" } })) }),
            )
    }

    async fn get_page(router: Router, filter: ExpenseFilter) -> Result<Html, Error> {
        let state = get_test_app_state_with_stub(router).await;
        let response = get_expenses_page(
            State(ExpensesPageState {
                api: state.api.clone(),
                local_timezone: state.local_timezone.clone(),
            }),
            Extension(test_token()),
            Query(filter),
        )
        .await?;

        assert_eq!(response.status(), StatusCode::OK);
        Ok(parse_html_document(response).await)
    }

    fn table_rows(document: &Html) -> Vec<ElementRef<'_>> {
        document
            .select(&Selector::parse("tbody tr").unwrap())
            .collect()
    }

    #[tokio::test]
    async fn lists_all_expenses() {
        let document = get_page(stub_api(), ExpenseFilter::default()).await.unwrap();
        assert_valid_html(&document);

        let rows = table_rows(&document);
        assert_eq!(rows.len(), 3);

        let first_row = rows[0].text().collect::<String>();
        assert!(first_row.contains("Lunch"), "got {first_row}");
        assert!(first_row.contains("£12.50"), "got {first_row}");

        let delete = rows[0]
            .select(&Selector::parse("button[hx-delete]").unwrap())
            .next()
            .unwrap();
        assert_eq!(delete.value().attr("hx-delete"), Some("/api/expenses/e1"));
        assert_eq!(delete.value().attr("hx-swap"), Some("delete"));
    }

    #[tokio::test]
    async fn has_create_form() {
        let document = get_page(stub_api(), ExpenseFilter::default()).await.unwrap();

        let form = document
            .select(&Selector::parse("form[hx-post]").unwrap())
            .next()
            .expect("want create expense form");
        assert_hx_endpoint(&form, endpoints::EXPENSES_API, "hx-post");

        let options: Vec<_> = form
            .select(&Selector::parse("select[name=category] option").unwrap())
            .filter_map(|option| option.value().attr("value"))
            .collect();
        assert_eq!(options, ["", "c1", "c2"]);
    }

    #[tokio::test]
    async fn filters_by_category_and_search() {
        let filter = ExpenseFilter {
            category: Some("Food".to_owned()),
            search: Some("coffee".to_owned()),
            ..Default::default()
        };

        let document = get_page(stub_api(), filter).await.unwrap();

        let rows = table_rows(&document);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].text().collect::<String>().contains("Coffee"));

        let reset = document
            .select(&Selector::parse("a").unwrap())
            .find(|link| link.text().collect::<String>() == "Reset");
        assert!(reset.is_some(), "want reset link when filters are active");
    }

    #[tokio::test]
    async fn shows_empty_state_without_expenses() {
        let router = Router::new()
            .route("/expenses", get(|| async { Json(json!({ "expenses": [] })) }))
            .route("/categories", get(|| async { Json(json!({ "categories": [] })) }))
            .route("/profile", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));

        let document = get_page(router, ExpenseFilter::default()).await.unwrap();

        assert!(table_rows(&document).is_empty());
        let text = document.root_element().text().collect::<String>();
        assert!(text.contains("No expenses yet"));
        assert!(text.contains("$0.00"), "currency should fall back to USD");
    }

    #[tokio::test]
    async fn expired_session_is_an_error() {
        let router = Router::new()
            .route("/expenses", get(|| async { StatusCode::UNAUTHORIZED }))
            .route("/categories", get(|| async { StatusCode::UNAUTHORIZED }))
            .route("/profile", get(|| async { StatusCode::UNAUTHORIZED }));

        let result = get_page(router, ExpenseFilter::default()).await;

        assert_eq!(result.unwrap_err(), Error::Unauthorized);
    }
}
