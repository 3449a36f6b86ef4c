//! Displays the monthly budget, how much of it is spent and a form to change it.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    api::{ApiClient, AuthToken},
    budget::core::{BudgetOverview, get_budget},
    currency::{currency_symbol, format_amount},
    endpoints,
    html::{
        CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
        currency_input_styles, progress_bar, stat_card, submit_button,
    },
    navigation::NavBar,
    profile::get_currency_or_default,
};

const WARNING_STYLE: &str = "p-4 rounded-lg border border-red-300 bg-red-50 text-red-800 \
    dark:bg-gray-800 dark:text-red-400 dark:border-red-800";
const INFO_STYLE: &str = "p-4 rounded-lg border border-blue-300 bg-blue-50 text-blue-800 \
    dark:bg-gray-800 dark:text-blue-400 dark:border-blue-800";

fn budget_status(budget: &BudgetOverview) -> Markup {
    let status = budget.status();
    let style = if status.is_warning() { WARNING_STYLE } else { INFO_STYLE };

    html! {
        div id="budget-status" role="status" class=(style)
        {
            h2 class="font-semibold" { (status.title()) }
            p class="mt-1 text-sm" { (status.description()) }
        }
    }
}

fn budget_form(budget: &BudgetOverview, currency: &str) -> Markup {
    let utilisation = budget.utilisation();
    let fill_style = if utilisation > 100.0 {
        "bg-red-600"
    } else if utilisation >= 90.0 {
        "bg-yellow-400"
    } else {
        "bg-blue-600"
    };

    html! {
        section class=(CARD_STYLE)
        {
            h2 class="text-lg font-semibold" { "Monthly Budget" }
            p class="mb-4 text-sm text-gray-500 dark:text-gray-400" { "Set your overall monthly budget" }

            form
                hx-post=(endpoints::BUDGET_API)
                hx-target-error="#alert-container"
                hx-disabled-elt="#submit-button"
                class="flex flex-col gap-4 sm:flex-row sm:items-end"
            {
                div class="flex-1"
                {
                    label for="monthly_budget" class=(FORM_LABEL_STYLE) { "Monthly budget" }
                    div class="input-wrapper w-full"
                    {
                        input
                            type="number"
                            name="monthly_budget"
                            id="monthly_budget"
                            step="0.01"
                            min="0.01"
                            placeholder=(format!("Enter monthly budget ({})", currency_symbol(currency)))
                            value=[(budget.monthly_budget > 0.0).then(|| format!("{:.2}", budget.monthly_budget))]
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div class="sm:w-40" { (submit_button("Update")) }
            }

            div class="mt-6 space-y-2"
            {
                div class="flex justify-between text-sm"
                {
                    span { "Current Spending" }
                    span class="tabular-nums" { (format_amount(budget.total_expenses, currency)) }
                }
                (progress_bar(utilisation, fill_style))
                div class="flex justify-between text-sm text-gray-500 dark:text-gray-400"
                {
                    span { "Monthly Budget" }
                    span class="tabular-nums" { (format_amount(budget.monthly_budget, currency)) }
                }
            }
        }
    }
}

fn month_summary(budget: &BudgetOverview, currency: &str) -> Markup {
    let counts = budget.transaction_count.clone().unwrap_or_default();

    html! {
        div class="grid w-full gap-4 grid-cols-1 sm:grid-cols-3"
        {
            (stat_card(
                "Income",
                &format_amount(budget.total_income, currency),
                &format!("{} this month", counts.incomes)
            ))
            (stat_card(
                "Expenses",
                &format_amount(budget.total_expenses, currency),
                &format!("{} this month", counts.expenses)
            ))
            (stat_card("Balance", &format_amount(budget.balance, currency), "Income minus expenses"))
        }
    }
}

fn budget_view(budget: &BudgetOverview, currency: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::BUDGET_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl space-y-6"
            {
                header
                {
                    h1 class="text-xl font-bold" { "Budget Management" }
                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Set and track your monthly budget"
                        @if let Some(month) = budget.month.as_deref().filter(|month| !month.is_empty()) {
                            " (" (month) ")"
                        }
                    }
                }

                (budget_status(budget))
                (budget_form(budget, currency))
                (month_summary(budget, currency))
            }
        }
    };

    base(
        "Budget",
        &[currency_input_styles(currency_symbol(currency))],
        &content,
    )
}

/// Renders the budget page.
pub async fn get_budget_page(
    State(api): State<ApiClient>,
    Extension(token): Extension<AuthToken>,
) -> Result<Response, Error> {
    let (budget, currency) = tokio::join!(
        get_budget(&api, &token),
        get_currency_or_default(&api, &token),
    );
    let budget = budget.inspect_err(|error| {
        tracing::error!("Could not fetch budget: {error}");
    })?;

    Ok(budget_view(&budget, &currency).into_response())
}
