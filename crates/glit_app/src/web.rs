//! Web form front-end: `GET /` shows the form, `POST /search` runs a harvest.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use glit_core::{HarvestRequest, ReportView};
use glit_engine::{deterministic_export_filename, HarvestPipeline, NoopProgressSink};
use glit_logging::{glit_info, glit_warn};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::sinks::html;

#[derive(Clone)]
pub struct WebState {
    pub pipeline: Arc<HarvestPipeline>,
    pub export_dir: PathBuf,
}

/// Fields posted by the search form. Checkboxes are absent when unticked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchForm {
    pub user_url: String,
    #[serde(default)]
    pub all_branches: Option<String>,
    #[serde(default)]
    pub save_to_file: Option<String>,
}

impl SearchForm {
    pub fn into_request(self, export_dir: &Path) -> HarvestRequest {
        let all_branches = is_true(self.all_branches.as_deref());
        let save = is_true(self.save_to_file.as_deref());
        let request = HarvestRequest::new(self.user_url).all_branches(all_branches);
        if save {
            let filename = deterministic_export_filename(&request.profile_url);
            request.export_to(export_dir.join(filename))
        } else {
            request
        }
    }
}

fn is_true(value: Option<&str>) -> bool {
    value == Some("true")
}

pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/search", post(search))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: WebState, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    glit_info!("Server is running on http://{}", addr);
    println!("Server is running on http://{addr}");
    axum::serve(listener, router(state))
        .await
        .context("web server stopped")
}

async fn index() -> Html<String> {
    Html(html::render_form())
}

async fn health() -> &'static str {
    "ok"
}

async fn search(State(state): State<WebState>, Form(form): Form<SearchForm>) -> Response {
    let request = form.into_request(&state.export_dir);
    glit_info!("Web search for {}", request.profile_url);

    match state.pipeline.run(&request, &NoopProgressSink).await {
        Ok(outcome) => {
            let view = ReportView::from_report(&outcome.report);
            let generated = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
            Html(html::render_results(
                &request.profile_url,
                &view,
                &outcome.export,
                &generated,
            ))
            .into_response()
        }
        Err(err) => {
            glit_warn!("Web search for {} failed: {}", request.profile_url, err);
            (
                StatusCode::BAD_GATEWAY,
                Html(html::render_error(&request.profile_url, &err.to_string())),
            )
                .into_response()
        }
    }
}
