//! The dashboard page handler and view.

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    api::{ApiClient, AuthToken},
    budget::get_budget,
    chart::{PageChart, chart_scripts},
    dashboard::{
        aggregation::{DashboardSummary, summarise},
        cards::summary_cards,
        charts::{charts_view, dashboard_charts},
        tables::{recent_transactions_view, top_categories_view},
    },
    endpoints,
    expense::get_expenses,
    html::{CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    income::get_incomes,
    insights::insights_placeholder,
    navigation::NavBar,
    profile::get_currency_or_default,
    timezone::local_today,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub api: ApiClient,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn no_data_view() -> Markup {
    html! {
        section id="getting-started" class={ (CARD_STYLE) " text-center" }
        {
            h2 class="text-xl font-semibold" { "Nothing here yet" }
            p class="mt-2 text-gray-500 dark:text-gray-400"
            {
                "Add an "
                a href=(endpoints::EXPENSES_VIEW) class=(LINK_STYLE) { "expense" }
                " or an "
                a href=(endpoints::INCOMES_VIEW) class=(LINK_STYLE) { "income" }
                " to see your charts and summaries."
            }
        }
    }
}

fn dashboard_view(summary: &DashboardSummary, charts: &[PageChart], currency: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl space-y-6"
            {
                header
                {
                    h1 class="text-2xl font-bold tracking-tight" { "Dashboard" }
                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Overview of your financial status"
                    }
                }

                (summary_cards(summary, currency))

                @if summary.has_data() {
                    (charts_view(charts))

                    div class="grid gap-4 grid-cols-1 lg:grid-cols-2"
                    {
                        (top_categories_view(summary.top_categories(), summary.monthly_expenses, currency))
                        (insights_placeholder())
                    }

                    (recent_transactions_view(&summary.recent_transactions, currency))
                } @else {
                    (no_data_view())
                    (insights_placeholder())
                }
            }
        }
    };

    let head_elements = if charts.is_empty() {
        Vec::new()
    } else {
        chart_scripts(charts).into()
    };

    base("Dashboard", &head_elements, &content)
}

/// Display a page with an overview of the user's finances.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(token): Extension<AuthToken>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let (expenses, incomes, budget, currency) = tokio::join!(
        get_expenses(&state.api, &token),
        get_incomes(&state.api, &token),
        get_budget(&state.api, &token),
        get_currency_or_default(&state.api, &token),
    );
    let expenses =
        expenses.inspect_err(|error| tracing::error!("Could not fetch expenses: {error}"))?;
    let incomes = incomes.inspect_err(|error| tracing::error!("Could not fetch incomes: {error}"))?;
    let budget = budget.inspect_err(|error| tracing::error!("Could not fetch budget: {error}"))?;

    let summary = summarise(&expenses, &incomes, budget.monthly_budget, today);
    let charts = if summary.has_data() {
        dashboard_charts(&summary, &currency)
    } else {
        Vec::new()
    };

    Ok(dashboard_view(&summary, &charts, &currency).into_response())
}
