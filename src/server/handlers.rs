use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use rust_embed::RustEmbed;
use serde::Deserialize;

use crate::contact::{handle_submission, ContactError, ErrorBody};
use crate::html_template::{index_page, route_page};
use crate::route::{load_route_view, RouteView};

use super::state::AppState;

#[derive(RustEmbed)]
#[folder = "frontend/"]
struct Asset;

fn asset_response(path: &str, content_type: &'static str) -> Response {
    match Asset::get(path) {
        Some(file) => (
            [(header::CONTENT_TYPE, content_type)],
            file.data.into_owned(),
        )
            .into_response(),
        None => {
            tracing::error!("Embedded asset missing: {}", path);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

pub async fn index_html(State(state): State<AppState>) -> Response {
    match Asset::get("index.html") {
        Some(file) => {
            let template = String::from_utf8_lossy(&file.data);
            index_page(&template, state.theme.default_theme()).into_response()
        }
        None => {
            tracing::error!("Embedded asset missing: index.html");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

pub async fn style_css() -> Response {
    asset_response("style.css", "text/css")
}

pub async fn script_js() -> Response {
    asset_response("script.js", "application/javascript")
}

/// `POST /api/contact`. The body is read raw so a non-JSON payload still
/// gets a JSON error back.
pub async fn submit_contact(State(state): State<AppState>, body: Bytes) -> Response {
    match handle_submission(state.mailer.as_ref(), &state.mailbox, &body).await {
        Ok(accepted) => Json(accepted).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub url: String,
    pub name: Option<String>,
}

/// `GET /api/route?url=...&name=...`. Always 200: a broken route file
/// renders as a placeholder.
pub async fn get_route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Json<RouteView> {
    Json(load_route_view(state.routes.as_ref(), &query.url, query.name.as_deref()).await)
}

/// `GET /map?url=...&name=...`, the standalone map page.
pub async fn view_route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Html<String> {
    let view = load_route_view(state.routes.as_ref(), &query.url, query.name.as_deref()).await;
    route_page(&view, state.theme.default_theme())
}

/// Response for a panic anywhere below the panic-catching layer.
pub fn panic_response(_err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    tracing::error!("Handler panicked");
    let error = ContactError::Internal("handler panicked".to_string());
    (error.status(), Json(ErrorBody::new(error.public_message()))).into_response()
}
