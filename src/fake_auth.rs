//! Stand-in OAuth endpoints for account linking, every user gets the same fixed tokens.

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Query};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

const CODE: &str = "xxxxxx";
const ACCESS_TOKEN: &str = "123access";
const REFRESH_TOKEN: &str = "123refresh";
const SECS_PER_DAY: u64 = 86400;

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/fakeauth", get(fake_auth))
        .route("/faketoken", post(fake_token))
}

#[derive(Debug, Deserialize)]
struct AuthParams {
    redirect_uri: String,
    #[serde(default)]
    state: String,
}

async fn fake_auth(Query(params): Query<AuthParams>) -> Response {
    let location = format!(
        "{}?code={CODE}&state={}",
        params.redirect_uri, params.state
    );
    debug!(location, "Redirecting");

    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

#[derive(Debug, Default, Deserialize)]
struct TokenParams {
    grant_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct Token {
    token_type: &'static str,
    access_token: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'static str>,
    expires_in: u64,
}

/// The grant type is taken from the query string, falling back to the form body.
async fn fake_token(
    Query(query): Query<TokenParams>,
    form: Result<Form<TokenParams>, FormRejection>,
) -> Response {
    let grant_type = query
        .grant_type
        .or_else(|| form.ok().and_then(|Form(form)| form.grant_type));
    debug!(?grant_type, "Token request");

    let refresh_token = match grant_type.as_deref() {
        Some("authorization_code") => Some(REFRESH_TOKEN),
        Some("refresh_token") => None,
        _ => {
            warn!(?grant_type, "Unsupported grant type");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "unsupported_grant_type" })),
            )
                .into_response();
        }
    };

    Json(Token {
        token_type: "bearer",
        access_token: ACCESS_TOKEN,
        refresh_token,
        expires_in: SECS_PER_DAY,
    })
    .into_response()
}
