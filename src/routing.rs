//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, patch, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_forgot_password_page, get_log_in_page, get_log_out,
        get_sign_up_page, post_forgot_password, post_log_in, post_sign_up,
    },
    budget::{get_budget_page, update_budget_endpoint},
    dashboard::get_dashboard_page,
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_expenses_page, get_subcategory_select,
    },
    income::{create_income_endpoint, delete_income_endpoint, get_incomes_page},
    insights::get_insights_panel,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    notification::{
        clear_notifications_endpoint, get_notification_bell, mark_all_notifications_read_endpoint,
        mark_notification_read_endpoint,
    },
    profile::{
        delete_account_endpoint, get_settings_page, send_monthly_summary_endpoint,
        update_profile_endpoint,
    },
    savings::{
        contribute_endpoint, delete_savings_plan_endpoint, get_savings_page,
        save_savings_plan_endpoint,
    },
    transaction::get_transactions_page,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::SIGN_UP_VIEW, get(get_sign_up_page))
        .route(endpoints::SIGN_UP_API, post(post_sign_up))
        .route(
            endpoints::FORGOT_PASSWORD_VIEW,
            get(get_forgot_password_page),
        )
        .route(endpoints::FORGOT_PASSWORD_API, post(post_forgot_password))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(endpoints::INCOMES_VIEW, get(get_incomes_page))
        .route(endpoints::BUDGET_VIEW, get(get_budget_page))
        .route(endpoints::SAVINGS_VIEW, get(get_savings_page))
        .route(endpoints::SETTINGS_VIEW, get(get_settings_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // Routes called by HTMX need the HX-REDIRECT header for auth redirects to work properly.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::EXPENSES_API, post(create_expense_endpoint))
            .route(endpoints::DELETE_EXPENSE, delete(delete_expense_endpoint))
            .route(endpoints::EXPENSE_SUBCATEGORIES, get(get_subcategory_select))
            .route(endpoints::INCOMES_API, post(create_income_endpoint))
            .route(endpoints::DELETE_INCOME, delete(delete_income_endpoint))
            .route(endpoints::BUDGET_API, post(update_budget_endpoint))
            .route(endpoints::SAVINGS_API, post(save_savings_plan_endpoint))
            .route(
                endpoints::SAVINGS_PLAN,
                delete(delete_savings_plan_endpoint),
            )
            .route(endpoints::SAVINGS_CONTRIBUTE, post(contribute_endpoint))
            .route(endpoints::NOTIFICATIONS_API, get(get_notification_bell))
            .route(
                endpoints::NOTIFICATION_READ,
                patch(mark_notification_read_endpoint),
            )
            .route(
                endpoints::NOTIFICATIONS_READ_ALL,
                patch(mark_all_notifications_read_endpoint),
            )
            .route(
                endpoints::NOTIFICATIONS_CLEAR,
                delete(clear_notifications_endpoint),
            )
            .route(endpoints::INSIGHTS_API, get(get_insights_panel))
            .route(
                endpoints::PROFILE_API,
                axum::routing::put(update_profile_endpoint).delete(delete_account_endpoint),
            )
            .route(
                endpoints::MONTHLY_SUMMARY_API,
                post(send_monthly_summary_endpoint),
            )
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        auth::COOKIE_TOKEN,
        endpoints,
        routing::{build_router, get_index_page},
        test_utils::{get_test_app_state, get_test_app_state_with_stub, test_session_cookie},
    };

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn pages_require_a_session() {
        let server = TestServer::try_new(build_router(get_test_app_state("http://127.0.0.1:1")))
            .expect("Could not create test server.");

        let response = server.get(endpoints::BUDGET_VIEW).await;

        response.assert_status(StatusCode::SEE_OTHER);
        let location = response.header("location");
        let location = location.to_str().unwrap();
        assert!(location.starts_with(endpoints::LOG_IN_VIEW), "got {location}");
    }

    #[tokio::test]
    async fn htmx_routes_redirect_with_header() {
        let server = TestServer::try_new(build_router(get_test_app_state("http://127.0.0.1:1")))
            .expect("Could not create test server.");

        let response = server.get(endpoints::NOTIFICATIONS_API).await;

        assert!(response.headers().get("hx-redirect").is_some());
    }

    #[tokio::test]
    async fn log_in_page_is_public() {
        let server = TestServer::try_new(build_router(get_test_app_state("http://127.0.0.1:1")))
            .expect("Could not create test server.");

        server.get(endpoints::LOG_IN_VIEW).await.assert_status_ok();
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = TestServer::try_new(build_router(get_test_app_state("http://127.0.0.1:1")))
            .expect("Could not create test server.");

        server
            .get("/definitely/not/a/page")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn budget_page_renders_with_session() {
        let router = Router::new()
            .route("/budget", get(|| async { Json(json!({ "monthlyBudget": 100 })) }))
            .route("/profile", get(|| async { Json(json!({ "data": {} })) }));
        let state = get_test_app_state_with_stub(router).await;
        let cookie = test_session_cookie(&state);
        let server = TestServer::try_new(build_router(state)).expect("Could not create test server.");

        let response = server.get(endpoints::BUDGET_VIEW).add_cookie(cookie).await;

        response.assert_status_ok();
        assert!(response.text().contains("Budget Management"));
    }

    #[tokio::test]
    async fn rejected_api_token_returns_to_page_after_log_in() {
        let router = Router::new()
            .route("/budget", get(|| async { StatusCode::UNAUTHORIZED }))
            .route("/profile", get(|| async { StatusCode::UNAUTHORIZED }));
        let state = get_test_app_state_with_stub(router).await;
        let cookie = test_session_cookie(&state);
        let server = TestServer::try_new(build_router(state)).expect("Could not create test server.");

        let response = server.get(endpoints::BUDGET_VIEW).add_cookie(cookie).await;

        response.assert_status(StatusCode::SEE_OTHER);
        let want_query =
            serde_urlencoded::to_string([("redirect_url", endpoints::BUDGET_VIEW)]).unwrap();
        assert_eq!(
            response.header("location"),
            format!("{}?{}", endpoints::LOG_IN_VIEW, want_query)
        );
        assert_eq!(
            response.cookie(COOKIE_TOKEN).max_age(),
            Some(time::Duration::ZERO)
        );
    }

    #[tokio::test]
    async fn rejected_api_token_redirects_htmx_request_to_current_page() {
        let router = Router::new().route("/notifications", get(|| async { StatusCode::UNAUTHORIZED }))
            .route("/profile", get(|| async { Json(json!({ "data": {} })) }));
        let state = get_test_app_state_with_stub(router).await;
        let cookie = test_session_cookie(&state);
        let server = TestServer::try_new(build_router(state)).expect("Could not create test server.");

        let response = server
            .get(endpoints::NOTIFICATIONS_API)
            .add_cookie(cookie)
            .add_header("HX-Request", "true")
            .add_header("HX-Current-URL", endpoints::SAVINGS_VIEW)
            .await;

        let want_query =
            serde_urlencoded::to_string([("redirect_url", endpoints::SAVINGS_VIEW)]).unwrap();
        assert_eq!(
            response.header("hx-redirect"),
            format!("{}?{}", endpoints::LOG_IN_VIEW, want_query)
        );
    }
}
