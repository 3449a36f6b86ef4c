//! The ECharts charts on the dashboard.
//!
//! - **Trends**: monthly income and expenses as area lines
//! - **Income vs Expenses**: the same months side by side as bars
//! - **Categories**: this month's spending per category

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AreaStyle, AxisLabel, AxisType, Emphasis, EmphasisFocus, ItemStyle, Tooltip, Trigger},
    series::{Line, Pie, bar},
};
use maud::{Markup, html};

use crate::{
    chart::{PageChart, chart_container, currency_formatter, currency_tooltip},
    dashboard::aggregation::{DashboardSummary, MonthlyTotals, TREND_MONTHS},
};

const INCOME_COLOUR: &str = "#22c55e";
const EXPENSE_COLOUR: &str = "#ef4444";

fn month_labels(trends: &[MonthlyTotals]) -> Vec<String> {
    trends.iter().map(|month| month.label.to_owned()).collect()
}

fn income_values(trends: &[MonthlyTotals]) -> Vec<f64> {
    trends.iter().map(|month| month.income).collect()
}

fn expense_values(trends: &[MonthlyTotals]) -> Vec<f64> {
    trends.iter().map(|month| month.expenses).collect()
}

fn trend_base(title: &str, trends: &[MonthlyTotals], currency: &str) -> Chart {
    Chart::new()
        .title(
            Title::new()
                .text(title)
                .subtext(format!("Last {TREND_MONTHS} months")),
        )
        .tooltip(currency_tooltip(currency))
        .legend(Legend::new().top("1%").left("center"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(80)
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(month_labels(trends)),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter(currency))),
        )
}

pub(super) fn trends_chart(trends: &[MonthlyTotals], currency: &str) -> Chart {
    trend_base("Trends", trends, currency)
        .series(
            Line::new()
                .name("Income")
                .item_style(ItemStyle::new().color(INCOME_COLOUR))
                .area_style(AreaStyle::new())
                .data(income_values(trends)),
        )
        .series(
            Line::new()
                .name("Expenses")
                .item_style(ItemStyle::new().color(EXPENSE_COLOUR))
                .area_style(AreaStyle::new())
                .data(expense_values(trends)),
        )
}

pub(super) fn comparison_chart(trends: &[MonthlyTotals], currency: &str) -> Chart {
    trend_base("Income vs Expenses", trends, currency)
        .series(
            bar::Bar::new()
                .name("Income")
                .item_style(ItemStyle::new().color(INCOME_COLOUR))
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(income_values(trends)),
        )
        .series(
            bar::Bar::new()
                .name("Expenses")
                .item_style(ItemStyle::new().color(EXPENSE_COLOUR))
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(expense_values(trends)),
        )
}

pub(super) fn categories_chart(breakdown: &[(String, f64)], currency: &str) -> Chart {
    let data: Vec<(f64, &str)> = breakdown
        .iter()
        .map(|(name, amount)| (*amount, name.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Categories").subtext("Spending this month"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter(currency)),
        )
        .legend(Legend::new().top("bottom"))
        .series(
            Pie::new()
                .name("Spending")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

/// The charts shown for `summary`.
///
/// The category chart is left out when nothing was spent this month.
pub(super) fn dashboard_charts(summary: &DashboardSummary, currency: &str) -> Vec<PageChart> {
    let mut charts = vec![
        PageChart::new("trends-chart", trends_chart(&summary.trends, currency)),
        PageChart::new("comparison-chart", comparison_chart(&summary.trends, currency)),
    ];

    if !summary.category_breakdown.is_empty() {
        charts.push(PageChart::new(
            "categories-chart",
            categories_chart(&summary.category_breakdown, currency),
        ));
    }

    charts
}

pub(super) fn charts_view(charts: &[PageChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto"
        {
            h2 class="mb-4 text-xl font-semibold" { "Financial Overview" }

            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    (chart_container(chart))
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use crate::dashboard::aggregation::MonthlyTotals;

    use super::{categories_chart, trends_chart};

    fn trends() -> Vec<MonthlyTotals> {
        vec![
            MonthlyTotals {
                label: "Feb",
                income: 1000.0,
                expenses: 400.0,
            },
            MonthlyTotals {
                label: "Mar",
                income: 1200.0,
                expenses: 650.5,
            },
        ]
    }

    #[test]
    fn trends_chart_has_income_and_expense_series() {
        let options = trends_chart(&trends(), "USD").to_string();

        assert!(options.contains("\"Feb\""));
        assert!(options.contains("\"Income\""));
        assert!(options.contains("\"Expenses\""));
        assert!(options.contains("650.5"));
    }

    #[test]
    fn categories_chart_names_each_slice() {
        let breakdown = vec![("Food".to_owned(), 80.0), ("Transport".to_owned(), 20.0)];

        let options = categories_chart(&breakdown, "EUR").to_string();

        assert!(options.contains("\"Food\""));
        assert!(options.contains("\"Transport\""));
        assert!(options.contains("EUR"));
    }
}
