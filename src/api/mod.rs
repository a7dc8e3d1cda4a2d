//! HTTP layer
//!
//! Axum router and handlers for the four read-only pages. Handlers only
//! translate between HTTP and [`PageService`]: extract the path parameter,
//! ask the service for a page context, render it, map errors to statuses.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::services::{PageError, PageService, TemplateEngine};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pages: Arc<PageService>,
    pub templates: Arc<TemplateEngine>,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/posts/{slug}", get(post_detail))
        .route("/tags/{title}", get(tag_filter))
        .route("/contacts", get(contacts))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = match &self {
            PageError::NotFound(_) => StatusCode::NOT_FOUND,
            PageError::Invariant(_) | PageError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, self.to_string()).into_response()
    }
}

async fn home(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let context = state.pages.home().await?;
    let body = state.templates.render("index.html", &context)?;
    Ok(Html(body))
}

async fn post_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, PageError> {
    let context = state.pages.post_detail(&slug).await?;
    let body = state.templates.render("post-details.html", &context)?;
    Ok(Html(body))
}

async fn tag_filter(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Html<String>, PageError> {
    let context = state.pages.tag_filter(&title).await?;
    let body = state.templates.render("posts-list.html", &context)?;
    Ok(Html(body))
}

async fn contacts(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let context = state.pages.contacts().await?;
    let body = state.templates.render("contacts.html", &context)?;
    Ok(Html(body))
}
