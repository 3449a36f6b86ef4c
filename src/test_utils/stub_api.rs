use axum::{Router, response::IntoResponse};
use axum_extra::extract::PrivateCookieJar;
use tokio::net::TcpListener;

use crate::{
    AppState,
    api::AuthToken,
    auth::{SessionUser, set_auth_cookie},
};

/// Serve `router` on an ephemeral localhost port and return its base URL.
///
/// The server runs until the test's runtime shuts down.
pub(crate) async fn spawn_stub_api(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind stub API listener");
    let address = listener
        .local_addr()
        .expect("Could not get stub API address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Stub API server failed");
    });

    format!("http://{address}")
}

/// An [AppState] that talks to the API at `api_base_url`.
pub(crate) fn get_test_app_state(api_base_url: &str) -> AppState {
    AppState::new("foobar", "Etc/UTC", api_base_url, 60).expect("Could not create app state")
}

/// An [AppState] that talks to a stub API serving `router`.
pub(crate) async fn get_test_app_state_with_stub(router: Router) -> AppState {
    let base_url = spawn_stub_api(router).await;
    get_test_app_state(&base_url)
}

pub(crate) const TEST_API_TOKEN: &str = "test-api-token";

pub(crate) fn test_token() -> AuthToken {
    AuthToken::new(TEST_API_TOKEN)
}

pub(crate) fn test_user() -> SessionUser {
    SessionUser {
        name: "Ada Lovelace".to_owned(),
        email: "ada@example.com".to_owned(),
    }
}

/// The `Set-Cookie`d session cookie for a logged in test user, for use with `axum_test`.
pub(crate) fn test_session_cookie(state: &AppState) -> axum_extra::extract::cookie::Cookie<'static> {
    let jar = set_auth_cookie(
        PrivateCookieJar::new(state.cookie_key.clone()),
        TEST_API_TOKEN,
        test_user(),
        state.cookie_duration,
    )
    .expect("Could not set auth cookie");

    let response = jar.into_response();
    let header = response
        .headers()
        .get(axum::http::header::SET_COOKIE)
        .expect("Missing Set-Cookie header")
        .to_str()
        .expect("Set-Cookie header is not ASCII")
        .to_owned();

    axum_extra::extract::cookie::Cookie::parse(header).expect("Could not parse session cookie")
}
