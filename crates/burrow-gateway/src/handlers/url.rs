use std::net::SocketAddr;

use crate::error::Result;
use crate::model::ShortenRequest;
use crate::state::AppState;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use burrow_redirector::Resolution;
use burrow_shortener::ShortenParams;
use tracing::debug;

/// Creates a short link and answers with its full URL as plain text.
pub async fn shorten_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(request): Json<ShortenRequest>,
) -> Result<String> {
    let params = ShortenParams {
        target_url: request.url,
        creator_address: Some(peer.ip().to_string()),
        // no authentication layer yet
        creator_identity: None,
    };

    let code = state
        .shortener()
        .shorten(params, Some(state.deadline()))
        .await?;

    Ok(state.short_url(&code))
}

pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    match state
        .redirector()
        .resolve(&code, Some(state.deadline()))
        .await?
    {
        Resolution::Redirect(url) => Ok(Redirect::permanent(&url).into_response()),
        Resolution::NotFound => {
            debug!(code = %code, "no link for short code");
            Ok(StatusCode::NOT_FOUND.into_response())
        }
    }
}
