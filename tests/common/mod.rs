#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo, routing::get};
use shortlink::api::handlers::{health_handler, redirect_handler};
use shortlink::api::routes::api_routes;
use shortlink::domain::entities::ShortLink;
use shortlink::domain::repositories::ShortLinkRepository;
use shortlink::infrastructure::cache::{CacheService, MemoryCache};
use shortlink::infrastructure::persistence::InMemoryShortLinkRepository;
use shortlink::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;

pub const CLIENT_IP: &str = "127.0.0.1";

/// Handles to the collaborators behind a test [`AppState`], for seeding and
/// inspecting them directly.
pub struct TestContext {
    pub state: AppState,
    pub repository: Arc<InMemoryShortLinkRepository>,
    pub cache: Arc<MemoryCache>,
}

pub fn create_test_context(base_url: Option<&str>) -> TestContext {
    let repository = Arc::new(InMemoryShortLinkRepository::new());
    let cache = Arc::new(MemoryCache::new());

    let state = AppState::new(
        repository.clone() as Arc<dyn ShortLinkRepository>,
        cache.clone() as Arc<dyn CacheService>,
        Duration::from_secs(3600),
        base_url.map(str::to_string),
    );

    TestContext {
        state,
        repository,
        cache,
    }
}

pub fn create_test_state() -> AppState {
    create_test_context(None).state
}

/// All routes, with a fixed peer address injected for `ConnectInfo`.
pub fn test_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api_routes())
        .layer(MockConnectInfoLayer)
        .with_state(state)
}

pub async fn insert_link(
    repository: &InMemoryShortLinkRepository,
    code: &str,
    url: &str,
) -> ShortLink {
    repository
        .create(ShortLink::new(url.to_string(), code.to_string(), None, None))
        .await
        .unwrap()
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = format!("{CLIENT_IP}:12345").parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
