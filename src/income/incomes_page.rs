//! Displays the user's incomes with filters, totals by source and a form for adding incomes.

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
    filter::{DateRange, totals_by_label},
    html::{
        BADGE_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, currency_input_styles, date_filter_input, delete_button, empty_state, note_cell, pluralise,
        progress_bar, stat_card, submit_button,
    },
    income::{
        core::{Income, get_incomes},
        query::IncomeFilter,
    },
    navigation::NavBar,
    profile::get_currency_or_default,
    timezone::local_today,
};

/// The state needed for the income page.
#[derive(Debug, Clone)]
pub struct IncomesPageState {
    pub api: ApiClient,
    pub local_timezone: String,
}

impl FromRef<AppState> for IncomesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

struct IncomesPageData<'a> {
    incomes: &'a [Income],
    filtered: Vec<&'a Income>,
    filter: &'a IncomeFilter,
    currency: &'a str,
    today: Date,
}

fn sum<'a>(incomes: impl IntoIterator<Item = &'a Income>) -> f64 {
    incomes.into_iter().map(|income| income.amount).sum()
}

fn total_in(incomes: &[Income], range: DateRange) -> f64 {
    sum(incomes.iter().filter(|income| range.contains(income.date)))
}

fn summary_cards(data: &IncomesPageData) -> Markup {
    let current_month = total_in(data.incomes, DateRange::month_of(data.today));
    let previous_month = total_in(data.incomes, DateRange::previous_month_of(data.today));

    html! {
        div class="grid w-full gap-4 grid-cols-1 sm:grid-cols-2 lg:grid-cols-4"
        {
            (stat_card("Current Month", &format_amount(current_month, data.currency), "Total income this month"))
            (stat_card("Previous Month", &format_amount(previous_month, data.currency), "Total income last month"))
            (stat_card(
                "Filtered Total",
                &format_amount(sum(data.filtered.iter().copied()), data.currency),
                &format!("{} shown", pluralise(data.filtered.len(), "income source"))
            ))
            (stat_card(
                "All Time",
                &format_amount(sum(data.incomes), data.currency),
                &format!("{} total", pluralise(data.incomes.len(), "income source"))
            ))
        }
    }
}

fn new_income_form(today: Date) -> Markup {
    html! {
        details class=(CARD_STYLE)
        {
            summary class="cursor-pointer text-lg font-semibold" { "Add Income" }

            form
                hx-post=(endpoints::INCOMES_API)
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
                    label for="source" class=(FORM_LABEL_STYLE) { "Source" }
                    input
                        type="text"
                        name="source"
                        id="source"
                        placeholder="e.g. Salary, Freelance"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
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
                    (submit_button("Add Income"))
                }
            }
        }
    }
}

fn filter_form(filter: &IncomeFilter) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            h2 class="text-lg font-semibold" { "Income Filters" }
            p class="mb-4 text-sm text-gray-500 dark:text-gray-400"
            {
                "Filter your income by date range or search by source and note"
            }

            form method="get" action=(endpoints::INCOMES_VIEW) class="grid gap-4 sm:grid-cols-3"
            {
                (date_filter_input("Start Date", "start_date", filter.start_date))
                (date_filter_input("End Date", "end_date", filter.end_date))

                div class="flex flex-col gap-1"
                {
                    label for="search" class=(FORM_LABEL_STYLE) { "Search" }
                    input
                        type="search"
                        name="search"
                        id="search"
                        placeholder="Search by source or note..."
                        value=[filter.search.as_deref()]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="flex items-center gap-4 sm:col-span-3"
                {
                    button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Apply filters" }

                    @if filter.is_active() {
                        a href=(endpoints::INCOMES_VIEW) class=(LINK_STYLE) { "Reset" }
                    }
                }
            }
        }
    }
}

fn source_breakdown(data: &IncomesPageData) -> Markup {
    let totals = totals_by_label(
        data.filtered
            .iter()
            .map(|income| (income.source.as_str(), income.amount)),
    );
    let grand_total: f64 = totals.iter().map(|(_, total)| total).sum();

    html! {
        section id="income-by-source" class=(CARD_STYLE)
        {
            h2 class="mb-4 text-lg font-semibold" { "Income by Source" }

            @if totals.is_empty() {
                p class="text-sm text-gray-500 dark:text-gray-400" { "No income to break down." }
            }

            ul class="space-y-3"
            {
                @for (source, total) in &totals {
                    @let share = if grand_total > 0.0 { total / grand_total * 100.0 } else { 0.0 };
                    li
                    {
                        div class="flex justify-between text-sm"
                        {
                            span { (source) }
                            span class="tabular-nums" { (format_amount(*total, data.currency)) }
                        }
                        (progress_bar(share, "bg-green-600"))
                    }
                }
            }
        }
    }
}

fn incomes_table(data: &IncomesPageData) -> Markup {
    let table_row = |income: &Income| {
        let delete_url = format_endpoint(endpoints::DELETE_INCOME, &income.id);

        html! {
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { time datetime=(income.date) { (income.date) } }
                td class=(TABLE_CELL_STYLE) { span class=(BADGE_STYLE) { (income.source) } }
                (note_cell(income.note()))
                td class="px-6 py-4 text-right tabular-nums text-green-600 dark:text-green-400"
                {
                    "+" (format_amount(income.amount, data.currency))
                }
                td class=(TABLE_CELL_STYLE)
                {
                    (delete_button(
                        &delete_url,
                        "Are you sure you want to delete this income? This cannot be undone.",
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
                @if data.incomes.is_empty() {
                    (empty_state("No income yet", "Add your first income to start tracking your earnings."))
                } @else {
                    (empty_state("No matching income", "Try changing or resetting the filters."))
                }
            } @else {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Source" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Note" }
                            th scope="col" class="px-6 py-3 text-right" { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for income in &data.filtered {
                            (table_row(income))
                        }
                    }
                }
            }
        }
    }
}

fn incomes_view(data: &IncomesPageData) -> Markup {
    let nav_bar = NavBar::new(endpoints::INCOMES_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-6xl space-y-6"
            {
                header
                {
                    h1 class="text-xl font-bold" { "Income" }
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Track and manage your income sources" }
                }

                (summary_cards(data))
                (new_income_form(data.today))
                (filter_form(data.filter))

                div class="grid gap-6 lg:grid-cols-3"
                {
                    div class="lg:col-span-2" { (incomes_table(data)) }
                    (source_breakdown(data))
                }
            }
        }
    };

    base(
        "Income",
        &[currency_input_styles(currency_symbol(data.currency))],
        &content,
    )
}

/// Renders the income page, applying the filters in the query string.
pub async fn get_incomes_page(
    State(state): State<IncomesPageState>,
    Extension(token): Extension<AuthToken>,
    Query(filter): Query<IncomeFilter>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let (incomes, currency) = tokio::join!(
        get_incomes(&state.api, &token),
        get_currency_or_default(&state.api, &token),
    );
    let incomes = incomes.inspect_err(|error| {
        tracing::error!("Could not fetch incomes: {error}");
    })?;

    let data = IncomesPageData {
        filtered: filter.apply(&incomes),
        incomes: &incomes,
        filter: &filter,
        currency: &currency,
        today,
    };

    Ok(incomes_view(&data).into_response())
}
