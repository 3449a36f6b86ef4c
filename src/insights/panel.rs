//! The AI insights panel on the dashboard, loaded after the page.

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
    currency::format_amount,
    endpoints,
    html::{BUTTON_SECONDARY_STYLE, CARD_STYLE, loading_spinner},
    insights::core::{AiInsights, display_kind, get_insights},
    profile::get_currency_or_default,
    timezone::get_local_offset,
};

#[derive(Debug, Clone)]
pub struct InsightsState {
    pub api: ApiClient,
    pub local_timezone: String,
}

impl FromRef<AppState> for InsightsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

const PANEL_ID: &str = "ai-insights";
const ITEM_STYLE: &str = "p-4 rounded-lg bg-gray-50 dark:bg-gray-700";

/// The panel shown while the insights load.
pub fn insights_placeholder() -> Markup {
    html! {
        section
            id=(PANEL_ID)
            class=(CARD_STYLE)
            hx-get=(endpoints::INSIGHTS_API)
            hx-trigger="load"
            hx-swap="outerHTML"
        {
            h2 class="text-xl font-semibold" { "AI Financial Insights" }
            p class="mt-4 text-sm text-gray-500 dark:text-gray-400"
            {
                (loading_spinner())
                "Analysing your finances..."
            }
        }
    }
}

fn insights_error() -> Markup {
    html! {
        section id=(PANEL_ID) class=(CARD_STYLE)
        {
            h2 class="text-xl font-semibold" { "AI Financial Insights" }
            p class="mt-4 text-sm text-red-600 dark:text-red-400" { "Failed to load AI insights" }
            button
                type="button"
                class={ (BUTTON_SECONDARY_STYLE) " mt-4 max-w-40" }
                hx-get=(endpoints::INSIGHTS_API)
                hx-target={ "#" (PANEL_ID) }
                hx-swap="outerHTML"
            {
                "Try again"
            }
        }
    }
}

fn summary_item(title: &str, value: &str) -> Markup {
    html! {
        div class="space-y-1"
        {
            p class="text-sm font-medium text-gray-500 dark:text-gray-400" { (title) }
            p class="text-2xl font-bold" { (value) }
        }
    }
}

/// Render the insights.
///
/// `monthly_budget` is shown when the analysis has no budget status.
pub fn insights_view(
    insights: &AiInsights,
    currency: &str,
    monthly_budget: f64,
    last_updated: Option<String>,
) -> Markup {
    let summary = &insights.summary;
    let budget_status = summary
        .budget_status
        .clone()
        .unwrap_or_else(|| format_amount(monthly_budget, currency));

    html! {
        section id=(PANEL_ID) class={ (CARD_STYLE) " space-y-6" }
        {
            h2 class="text-xl font-semibold" { "AI Financial Insights" }

            div class="grid gap-4 grid-cols-1 sm:grid-cols-2 lg:grid-cols-4"
            {
                (summary_item("Total Income", &format_amount(summary.total_income, currency)))
                (summary_item("Total Spent", &format_amount(summary.total_spent, currency)))
                (summary_item("Average Transaction", &format_amount(summary.average_transaction, currency)))
                (summary_item("Budget Status", &budget_status))
            }

            div id="key-insights" class="space-y-4"
            {
                h3 class="text-lg font-medium" { "Key Insights" }

                @if insights.insights.is_empty() {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "No insights yet." }
                } @else {
                    div class="grid gap-4 grid-cols-1 sm:grid-cols-2"
                    {
                        @for insight in &insights.insights {
                            div class=(ITEM_STYLE)
                            {
                                p class="text-sm font-medium capitalize" { (display_kind(&insight.kind)) }
                                p class="text-sm text-gray-600 dark:text-gray-300" { (insight.message) }
                            }
                        }
                    }
                }
            }

            @if !insights.predictions.is_empty() {
                div id="predictions" class="space-y-4"
                {
                    h3 class="text-lg font-medium" { "Financial Predictions" }

                    div class="grid gap-4 grid-cols-1 sm:grid-cols-2"
                    {
                        @for prediction in &insights.predictions {
                            div class=(ITEM_STYLE)
                            {
                                p class="text-sm font-medium capitalize" { (display_kind(&prediction.kind)) }
                                p class="text-sm text-gray-600 dark:text-gray-300" { (prediction.message) }
                            }
                        }
                    }
                }
            }

            @if !summary.top_categories.is_empty() {
                div id="insight-top-categories" class="space-y-4"
                {
                    h3 class="text-lg font-medium" { "Top Spending Categories" }

                    div class="grid gap-4 grid-cols-1 sm:grid-cols-2 md:grid-cols-3"
                    {
                        @for category in &summary.top_categories {
                            div class=(ITEM_STYLE)
                            {
                                p class="text-sm font-medium capitalize" { (category.category) }
                                p class="text-2xl font-bold mt-2" { (format_amount(category.amount, currency)) }
                            }
                        }
                    }
                }
            }

            @if let Some(metadata) = &insights.metadata {
                div
                    id="insights-metadata"
                    class="flex flex-col sm:flex-row justify-between gap-2 text-sm
                    text-gray-500 dark:text-gray-400"
                {
                    p { "Analysis based on last " (metadata.total_transactions) " transactions" }

                    @if let Some(last_updated) = last_updated {
                        p { "Last updated: " (last_updated) }
                    }
                }
            }
        }
    }
}

/// A route handler for the insights panel.
///
/// Failing to load the insights renders an error in the panel instead of
/// failing the dashboard.
pub async fn get_insights_panel(
    State(state): State<InsightsState>,
    Extension(token): Extension<AuthToken>,
) -> Response {
    let (insights, currency, budget) = tokio::join!(
        get_insights(&state.api, &token),
        get_currency_or_default(&state.api, &token),
        get_budget(&state.api, &token),
    );

    let insights = match insights {
        Ok(insights) => insights,
        Err(Error::Unauthorized) => return Error::Unauthorized.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not load AI insights: {error}");
            return insights_error().into_response();
        }
    };

    let monthly_budget = budget
        .inspect_err(|error| tracing::warn!("Could not load budget for insights: {error}"))
        .map_or(0.0, |budget| budget.monthly_budget);
    let last_updated = match get_local_offset(&state.local_timezone) {
        Some(offset) => insights
            .metadata
            .as_ref()
            .and_then(|metadata| metadata.last_updated(offset)),
        None => return Error::InvalidTimezoneError(state.local_timezone).into_alert_response(),
    };

    insights_view(&insights, &currency, monthly_budget, last_updated).into_response()
}
