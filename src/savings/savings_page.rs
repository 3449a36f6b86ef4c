//! Displays the savings plan, progress towards its target and the savings trend.

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisLabel, AxisType},
    series::Line,
};
use maud::{Markup, html};
use time::{Date, UtcOffset, macros::format_description};

use crate::{
    AppState, Error,
    api::{ApiClient, AuthToken},
    chart::{PageChart, chart_container, chart_scripts, currency_formatter, currency_tooltip},
    currency::{currency_symbol, format_amount},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base, currency_input_styles, empty_state, progress_bar,
        submit_button,
    },
    navigation::NavBar,
    profile::get_currency_or_default,
    savings::core::{MonthlySavings, SavingsPlan, get_savings_plan},
    timezone::get_local_offset,
};

const BUTTON_DANGER_STYLE: &str = "px-4 py-2 rounded text-white bg-red-600 hover:bg-red-700 \
    focus:ring-4 focus:ring-red-300 dark:focus:ring-red-900";

/// The state needed for the savings page.
#[derive(Debug, Clone)]
pub struct SavingsPageState {
    pub api: ApiClient,
    pub local_timezone: String,
}

impl FromRef<AppState> for SavingsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// "June 30, 2026".
fn format_target_date(date: Date) -> String {
    date.format(format_description!(
        "[month repr:long] [day padding:none], [year]"
    ))
    .unwrap_or_else(|_| date.to_string())
}

/// The month label shown on the chart, marking projected months.
fn month_label(month: &MonthlySavings) -> String {
    if month.is_projected {
        format!("{} (Projected)", month.name)
    } else {
        month.name.clone()
    }
}

fn savings_chart(monthly_data: &[MonthlySavings], currency: &str) -> Chart {
    let labels: Vec<String> = monthly_data.iter().map(month_label).collect();
    let values: Vec<f64> = monthly_data.iter().map(|month| month.savings).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Savings Trend")
                .subtext("Your monthly savings trend over time"),
        )
        .tooltip(currency_tooltip(currency))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter(currency))),
        )
        .series(Line::new().name("Savings").data(values))
}

fn plan_form(plan: Option<&SavingsPlan>, target_date: Option<Date>, currency: &str) -> Markup {
    let symbol = currency_symbol(currency);
    let button_text = if plan.is_some() {
        "Update Savings Plan"
    } else {
        "Create Savings Plan"
    };

    html! {
        section class=(CARD_STYLE)
        {
            h2 class="text-lg font-semibold" { "Savings Plan" }
            p class="mb-4 text-sm text-gray-500 dark:text-gray-400"
            {
                "Set your monthly contribution and target amount"
            }

            form
                hx-post=(endpoints::SAVINGS_API)
                hx-target-error="#alert-container"
                hx-disabled-elt="#submit-button"
                class="space-y-4"
            {
                @if let Some(plan) = plan {
                    input type="hidden" name="plan_id" value=(plan.id);
                }

                div
                {
                    label for="monthly_contribution" class=(FORM_LABEL_STYLE) { "Monthly Contribution" }
                    div class="input-wrapper w-full"
                    {
                        input
                            type="number"
                            name="monthly_contribution"
                            id="monthly_contribution"
                            step="0.01"
                            min="0"
                            placeholder=(format!("Enter monthly contribution ({symbol})"))
                            value=[plan.map(|plan| format!("{:.2}", plan.monthly_contribution))]
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label for="target_amount" class=(FORM_LABEL_STYLE) { "Target Amount" }
                    div class="input-wrapper w-full"
                    {
                        input
                            type="number"
                            name="target_amount"
                            id="target_amount"
                            step="0.01"
                            min="0.01"
                            placeholder=(format!("Enter target amount ({symbol})"))
                            value=[plan.map(|plan| format!("{:.2}", plan.target_amount))]
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label for="target_date" class=(FORM_LABEL_STYLE) { "Target Date (Optional)" }
                    input
                        type="date"
                        name="target_date"
                        id="target_date"
                        value=[target_date]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                (submit_button(button_text))
            }
        }
    }
}

fn progress_overview(plan: &SavingsPlan, target_date: Option<Date>, currency: &str) -> Markup {
    let contribute_url = format_endpoint(endpoints::SAVINGS_CONTRIBUTE, &plan.id);

    html! {
        section class=(CARD_STYLE)
        {
            h2 class="text-lg font-semibold" { "Progress Overview" }
            p class="mb-4 text-sm text-gray-500 dark:text-gray-400" { "Track your savings progress" }

            div class="space-y-2"
            {
                div class="flex justify-between text-sm"
                {
                    span { "Current Savings" }
                    span class="font-medium tabular-nums" { (format_amount(plan.current_amount, currency)) }
                }
                (progress_bar(plan.progress(), "bg-green-600"))
                div class="flex justify-between text-sm text-gray-500 dark:text-gray-400"
                {
                    span { "Target Amount" }
                    span class="font-medium tabular-nums" { (format_amount(plan.target_amount, currency)) }
                }
            }

            @if plan.can_contribute {
                div class="mt-4 space-y-2"
                {
                    div class="flex justify-between text-sm font-medium"
                    {
                        span { "Available Balance" }
                        span class="text-green-600 tabular-nums"
                        {
                            (format_amount(plan.current_balance.unwrap_or_default(), currency))
                        }
                    }

                    button
                        id="contribute-button"
                        hx-post=(contribute_url)
                        hx-target-error="#alert-container"
                        hx-disabled-elt="this"
                        class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Contribute " (format_amount(plan.monthly_contribution, currency))
                    }
                }
            }

            @if let Some(target_date) = target_date {
                div class="pt-4"
                {
                    p class="text-sm font-medium" { "Target Date" }
                    p class="my-1 text-2xl font-bold" { (format_target_date(target_date)) }
                    p class="text-xs text-gray-500 dark:text-gray-400" { (target_date.weekday()) }
                }
            }
        }
    }
}

fn savings_view(
    plan: Option<&SavingsPlan>,
    target_date: Option<Date>,
    chart: Option<&PageChart>,
    currency: &str,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::SAVINGS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-6"
            {
                header class="flex flex-col gap-4 sm:flex-row sm:items-center sm:justify-between"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Savings Goals" }
                        p class="text-sm text-gray-500 dark:text-gray-400" { "Track and manage your savings progress" }
                    }

                    @if let Some(plan) = plan {
                        button
                            hx-delete=(format_endpoint(endpoints::SAVINGS_PLAN, &plan.id))
                            hx-confirm="Are you sure you want to delete your savings plan? This cannot be undone."
                            hx-target-error="#alert-container"
                            class=(BUTTON_DANGER_STYLE)
                        {
                            "Delete Plan"
                        }
                    }
                }

                @if let Some(plan) = plan {
                    @let status = plan.status();
                    div id="savings-status" role="status" class=(CARD_STYLE)
                    {
                        h2 class="font-semibold" { (status.title()) }
                        p class="mt-1 text-sm" { (status.description()) }
                    }
                }

                div class="grid gap-4 grid-cols-1 md:grid-cols-2"
                {
                    (plan_form(plan, target_date, currency))

                    @if let Some(plan) = plan {
                        (progress_overview(plan, target_date, currency))
                    } @else {
                        section class=(CARD_STYLE)
                        {
                            (empty_state("No savings plan yet", "Create a plan to start tracking your progress."))
                        }
                    }
                }

                @if let Some(chart) = chart {
                    section class=(CARD_STYLE) { (chart_container(chart)) }
                }
            }
        }
    };

    let mut head_elements = vec![currency_input_styles(currency_symbol(currency))];
    if let Some(chart) = chart {
        head_elements.extend(chart_scripts(std::slice::from_ref(chart)));
    }

    base("Savings", &head_elements, &content)
}

/// Renders the savings page.
pub async fn get_savings_page(
    State(state): State<SavingsPageState>,
    Extension(token): Extension<AuthToken>,
) -> Result<Response, Error> {
    let offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let (plan, currency) = tokio::join!(
        get_savings_plan(&state.api, &token),
        get_currency_or_default(&state.api, &token),
    );
    let plan = plan.inspect_err(|error| {
        tracing::error!("Could not fetch savings plan: {error}");
    })?;

    Ok(render_savings(plan.as_ref(), offset, &currency).into_response())
}

fn render_savings(plan: Option<&SavingsPlan>, offset: UtcOffset, currency: &str) -> Markup {
    let target_date = plan
        .and_then(|plan| plan.target_date)
        .and_then(|timestamp| timestamp.to_local_date(offset));
    let chart = plan
        .filter(|plan| !plan.monthly_data.is_empty())
        .map(|plan| PageChart::new("savings-chart", savings_chart(&plan.monthly_data, currency)));

    savings_view(plan, target_date, chart.as_ref(), currency)
}
