//! JSON HTTP surface for the browser dashboard.
//!
//! | Route | Method | Body | Response |
//! |-------|--------|------|----------|
//! | `/api/news` | POST | [`DashboardRequest`] | [`DashboardResponse`] |
//! | `/api/categories` | GET | | configured [`Category`] list |
//! | `/health` | GET | | `ok` |

use crate::api::AskAsync;
use crate::config::Category;
use crate::dashboard::Dashboard;
use crate::models::{DashboardRequest, DashboardResponse};
use crate::search::NewsSearch;
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Build the axum router with the dashboard as shared state.
pub fn router<S, M>(dashboard: Arc<Dashboard<S, M>>) -> Router
where
    S: NewsSearch + Send + Sync + 'static,
    M: AskAsync + Send + Sync + 'static,
{
    Router::new()
        .route("/api/news", post(fetch_news::<S, M>))
        .route("/api/categories", get(list_categories::<S, M>))
        .route("/health", get(health))
        .with_state(dashboard)
}

async fn fetch_news<S, M>(
    State(dashboard): State<Arc<Dashboard<S, M>>>,
    Json(request): Json<DashboardRequest>,
) -> Json<DashboardResponse>
where
    S: NewsSearch + Send + Sync + 'static,
    M: AskAsync + Send + Sync + 'static,
{
    Json(dashboard.handle(&request).await)
}

async fn list_categories<S, M>(State(dashboard): State<Arc<Dashboard<S, M>>>) -> Json<Vec<Category>>
where
    S: NewsSearch + Send + Sync + 'static,
    M: AskAsync + Send + Sync + 'static,
{
    Json(dashboard.config().categories.clone())
}

async fn health() -> &'static str {
    "ok"
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve<S, M>(dashboard: Dashboard<S, M>, addr: SocketAddr) -> std::io::Result<()>
where
    S: NewsSearch + Send + Sync + 'static,
    M: AskAsync + Send + Sync + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Dashboard API listening");
    axum::serve(listener, router(Arc::new(dashboard))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::FakeModel;
    use crate::config::DashboardConfig;
    use crate::dashboard::NO_SELECTION_MESSAGE;
    use crate::query::DOMAIN_CONTEXT;
    use crate::search::tests::{FakeSearch, hit};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app(search: FakeSearch) -> Router {
        router(Arc::new(Dashboard::new(
            DashboardConfig::default(),
            search,
            FakeModel::replying("Epic news"),
        )))
    }

    fn post_news(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/news")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_empty_request_is_rejected_with_message() {
        let response = app(FakeSearch::default()).oneshot(post_news("{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: DashboardResponse = read_json(response).await;
        assert_eq!(body.error.as_deref(), Some(NO_SELECTION_MESSAGE));
    }

    #[tokio::test]
    async fn test_search_request_returns_articles_and_summary() {
        let query = format!("Epic AND {}", DOMAIN_CONTEXT);
        let search = FakeSearch::default().with(&query, Ok(vec![hit("Epic", Some("2025-01-01T00:00:00Z"))]));
        let response = app(search)
            .oneshot(post_news(r#"{"categories":[],"search":"Epic"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = read_json(response).await;
        assert_eq!(body["articles"][0]["category"], "Search Results");
        assert_eq!(body["articles"][0]["publishedAt"], "2025-01-01T00:00:00Z");
        assert_eq!(body["summary"], "• Epic news");
        assert_eq!(body["segments"][0]["kind"], "bullets");
    }

    #[tokio::test]
    async fn test_categories_and_health() {
        let response = app(FakeSearch::default())
            .oneshot(Request::get("/api/categories").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let categories: Vec<Category> = read_json(response).await;
        assert_eq!(categories, DashboardConfig::default().categories);

        let response = app(FakeSearch::default())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_client_error() {
        let response = app(FakeSearch::default())
            .oneshot(post_news("not json"))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}
