use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_handler, redirect_handler, shorten_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    /// Builds the router.
    ///
    /// `POST /shorten` reads the client address from `ConnectInfo`, so serve
    /// it with `into_make_service_with_connect_info::<SocketAddr>()`.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/shorten", post(shorten_handler))
            .route("/{code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use burrow_core::{LinkRecord, ReadStore, ShortCode};
    use burrow_generator::{SynthesizerSettings, TokenSynthesizer};
    use burrow_redirector::RedirectorService;
    use burrow_shortener::{RetryPolicy, ShortenerService};
    use burrow_storage::InMemoryStore;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    const BASE_URL: &str = "http://sho.rt/";

    fn app() -> (Router, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let generator = TokenSynthesizer::new(SynthesizerSettings::builder().build()).unwrap();
        let shortener = ShortenerService::new(Arc::clone(&store), generator, RetryPolicy::default());
        let redirector = RedirectorService::new(Arc::clone(&store));
        let state = AppState::new(
            Arc::new(shortener),
            Arc::new(redirector),
            BASE_URL,
            Duration::from_secs(5),
        );

        let router = App::router(state)
            .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));
        (router, store)
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn shorten_request(json: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/shorten")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (app, _) = app();

        let response = app.oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn shorten_then_redirect() {
        let (app, store) = app();

        let response = app
            .clone()
            .oneshot(shorten_request(r#"{"url":"https://example.com/some/page"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let short_url = body_text(response).await;
        let code = short_url
            .strip_prefix("http://sho.rt/")
            .expect("short url starts with the base url");
        assert_eq!(code.len(), 6);

        let record = store
            .get(&ShortCode::new(code).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.creator_address.as_deref(), Some("127.0.0.1"));
        assert!(record.creator_identity.is_none());

        let response = app.oneshot(get_request(&format!("/{code}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://example.com/some/page"
        );
    }

    #[tokio::test]
    async fn shorten_rejects_invalid_url() {
        let (app, store) = app();

        let response = app
            .oneshot(shorten_request(r#"{"url":"ftp://example.com"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn shorten_rejects_control_characters() {
        let (app, store) = app();

        let response = app
            .oneshot(shorten_request(r#"{"url":"https://example.com/a\u0001b"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn shorten_rejects_malformed_body() {
        let (app, _) = app();

        let response = app
            .oneshot(shorten_request(r#"{"link":"https://example.com"}"#))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let (app, _) = app();

        let response = app.oneshot(get_request("/doesnotexist")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn record_without_target_is_a_server_error() {
        let (app, store) = app();
        store.put_record(&ShortCode::new_unchecked("bad1"), LinkRecord::default());

        let response = app.oneshot(get_request("/bad1")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
