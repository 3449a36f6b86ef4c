//! Defines the partial that fills the subcategory picker for the selected category.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    api::{ApiClient, AuthToken},
    expense::{
        core::{get_categories, subcategories_of},
        expenses_page::subcategory_select,
    },
};

#[derive(Debug, Default, Deserialize)]
pub struct SubcategoryQuery {
    /// The ID of the selected category.
    #[serde(default)]
    pub category: String,
}

/// A route handler that renders the subcategory picker for the selected category.
pub async fn get_subcategory_select(
    State(api): State<ApiClient>,
    Extension(token): Extension<AuthToken>,
    Query(query): Query<SubcategoryQuery>,
) -> Response {
    let category = query.category.trim();
    if category.is_empty() {
        return subcategory_select(&[]).into_response();
    }

    match get_categories(&api, &token).await {
        Ok(categories) => subcategory_select(subcategories_of(&categories, category)).into_response(),
        Err(error) => {
            tracing::error!("Could not load subcategories of {category}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension, Json, Router,
        extract::{Query, State},
        routing::get,
    };
    use scraper::Selector;
    use serde_json::json;

    use crate::test_utils::{
        get_test_app_state, get_test_app_state_with_stub, parse_html_fragment, test_token,
    };

    use super::{SubcategoryQuery, get_subcategory_select};

    fn stub_api() -> Router {
        Router::new().route(
            "/categories",
            get(|| async {
                Json(json!({ "categories": [
                    { "id": "c1", "name": "Food", "subcategories": ["Groceries", "Dining"] },
                    { "id": "c2", "name": "Transport", "subcategories": ["Fuel"] }
                ]}))
            }),
        )
    }

    fn option_values(html: &scraper::Html) -> Vec<String> {
        html.select(&Selector::parse("select#subcategory option").unwrap())
            .map(|option| option.value().attr("value").unwrap_or_default().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn lists_only_the_selected_categorys_subcategories() {
        let state = get_test_app_state_with_stub(stub_api()).await;

        let response = get_subcategory_select(
            State(state.api.clone()),
            Extension(test_token()),
            Query(SubcategoryQuery {
                category: "c2".to_owned(),
            }),
        )
        .await;

        let html = parse_html_fragment(response).await;
        assert_eq!(option_values(&html), ["", "Fuel"]);
    }

    #[tokio::test]
    async fn no_category_disables_the_picker() {
        let state = get_test_app_state("http://127.0.0.1:1");

        let response = get_subcategory_select(
            State(state.api.clone()),
            Extension(test_token()),
            Query(SubcategoryQuery::default()),
        )
        .await;

        let html = parse_html_fragment(response).await;
        let select = html
            .select(&Selector::parse("select#subcategory").unwrap())
            .next()
            .expect("subcategory picker missing");
        assert!(select.value().attr("disabled").is_some());
        assert_eq!(option_values(&html), [""]);
    }
}
