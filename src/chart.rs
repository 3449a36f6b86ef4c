//! Rendering of ECharts charts built with `charming`.
//!
//! A chart is split into an empty container element, placed in the page body,
//! and a script that initialises ECharts in that container once the page has
//! loaded.

use charming::{
    Chart,
    element::{AxisPointer, AxisPointerType, JsFunction, Tooltip, Trigger},
};
use maud::{Markup, PreEscaped, html};

use crate::html::HeadElement;

/// A chart with its HTML container ID and ECharts configuration.
pub struct PageChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl PageChart {
    pub fn new(id: &'static str, chart: Chart) -> Self {
        Self {
            id,
            options: chart.to_string(),
        }
    }
}

/// The container for a single chart.
pub fn chart_container(chart: &PageChart) -> Markup {
    html! {
        div
            id=(chart.id)
            class="min-h-[320px] w-full rounded dark:bg-gray-100"
        {}
    }
}

/// The ECharts library and the script that initialises `charts`.
pub fn chart_scripts(charts: &[PageChart]) -> [HeadElement; 2] {
    [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(charts),
    ]
}

/// Generates JavaScript initialization code for `charts`.
///
/// Each chart follows the dark mode preference and resizes with the window.
fn charts_script(charts: &[PageChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom) return;
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Formats axis labels and tooltip values in `currency_code`.
pub fn currency_formatter(currency_code: &str) -> JsFunction {
    // The code only ever comes from the currency table, but keep it a valid JS string.
    let currency_code: String = currency_code
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect();

    JsFunction::new_with_args(
        "number",
        &format!(
            "const currencyFormatter = new Intl.NumberFormat(undefined, {{
              style: 'currency',
              currency: '{currency_code}'
            }});
            return (number) ? currencyFormatter.format(number) : \"-\";"
        ),
    )
}

/// A tooltip that shows every series at the hovered axis value as currency.
pub fn currency_tooltip(currency_code: &str) -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter(currency_code))
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
