use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, cors::CorsLayer,
    services::ServeDir, trace::TraceLayer,
};

pub mod handlers;
pub mod state;

pub use self::state::AppState;
use handlers::{
    get_route, index_html, panic_response, script_js, style_css, submit_contact, view_route,
};

// Create the main application router
pub fn create_app(state: AppState, routes_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index_html))
        .route("/style.css", get(style_css))
        .route("/script.js", get(script_js))
        .route("/api/contact", post(submit_contact))
        .route("/api/route", get(get_route))
        .route("/map", get(view_route))
        .nest_service("/routes", ServeDir::new(routes_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

pub async fn start_server(app: Router, host: [u8; 4], port: u16) -> Result<()> {
    let addr = SocketAddr::from((host, port));
    let listener = TcpListener::bind(addr).await?;

    println!("   ✅ HTTP server started at http://{}", addr);
    println!("   🗺️  API endpoints:");
    println!("      - POST /api/contact - Relay the contact form to the site owner");
    println!("      - GET /api/route?url=<routeUrl> - Route line, bounds and markers as JSON");
    println!("      - GET /map?url=<routeUrl> - Standalone route map page");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::email::testing::StubMailer;
    use crate::route::source::testing::MemoryRouteSource;
    use crate::settings::Settings;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    const TRACK: &str = r#"<gpx><trk><trkseg>
        <trkpt lat="39.0" lon="-105.0"/>
        <trkpt lat="39.1" lon="-105.1"/>
        <trkpt lat="39.2" lon="-105.2"/>
    </trkseg></trk></gpx>"#;

    fn app_with(mailer: Arc<StubMailer>) -> Router {
        let routes = MemoryRouteSource::default().with_file("/routes/loop.gpx", TRACK);
        let state = AppState::new(&Settings::default(), mailer, Arc::new(routes));
        create_app(state, Path::new("routes"))
    }

    async fn post_contact(app: Router, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/contact")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn contact_success_returns_provider_id() {
        let mailer = Arc::new(StubMailer::succeeding("re_abc123"));
        let (status, body) = post_contact(
            app_with(mailer.clone()),
            r#"{"name":"Jane","email":"jane@example.com","message":"Hi"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["id"], "re_abc123");
        assert_eq!(mailer.sent().len(), 1);
        assert_eq!(mailer.sent()[0].subject, "New Contact: Jane");
    }

    #[tokio::test]
    async fn contact_missing_fields_is_400_without_delivery() {
        let mailer = Arc::new(StubMailer::succeeding("unused"));
        let (status, body) = post_contact(
            app_with(mailer.clone()),
            r#"{"name":"Jane","message":"Hi"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Name, email, and message are required");
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn contact_invalid_email_is_400() {
        for email in ["foo", "foo@", "foo@bar"] {
            let mailer = Arc::new(StubMailer::succeeding("unused"));
            let body = format!(r#"{{"name":"Jane","email":"{email}","message":"Hi"}}"#);
            let (status, body) = post_contact(app_with(mailer.clone()), &body).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Invalid email address");
            assert!(mailer.sent().is_empty());
        }
    }

    #[tokio::test]
    async fn contact_delivery_failure_hides_provider_error() {
        let mailer = Arc::new(StubMailer::failing("API key re_live_secret is invalid"));
        let (status, body) = post_contact(
            app_with(mailer),
            r#"{"name":"Jane","email":"jane@example.com","message":"Hi"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to send email");
        assert!(!body.to_string().contains("re_live_secret"));
    }

    #[tokio::test]
    async fn contact_garbage_body_is_json_500() {
        let mailer = Arc::new(StubMailer::succeeding("unused"));
        let (status, body) = post_contact(app_with(mailer), "{{{").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn panics_become_json_500() {
        async fn boom() -> &'static str {
            panic!("boom")
        }

        let app = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(panic_response));

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn route_api_returns_map_view() {
        let app = app_with(Arc::new(StubMailer::succeeding("unused")));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/route?url=/routes/loop.gpx&name=Loop")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let view: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(view["status"], "map");
        assert_eq!(view["name"], "Loop");
        assert_eq!(view["bounds"]["minLng"], -105.2);
        assert_eq!(view["bounds"]["maxLat"], 39.2);
        assert_eq!(view["start"]["position"][0], -105.0);
        assert_eq!(view["finish"]["position"][1], 39.2);
    }

    #[tokio::test]
    async fn route_api_missing_file_is_placeholder() {
        let app = app_with(Arc::new(StubMailer::succeeding("unused")));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/route?url=/routes/missing.geojson")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let view: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(view["status"], "placeholder");
        assert_eq!(view["code"], "route_file_not_found");
        assert_eq!(view["name"], "missing.geojson");
    }

    #[tokio::test]
    async fn route_page_renders_html() {
        let app = app_with(Arc::new(StubMailer::succeeding("unused")));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/map?url=/routes/loop.gpx")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("L.map('map'"));
        assert!(page.contains("<title>loop.gpx</title>"));
    }

    #[tokio::test]
    async fn index_is_served_with_theme() {
        let app = app_with(Arc::new(StubMailer::succeeding("unused")));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        // Default settings follow a dark system preference
        assert!(page.contains(r#"<html lang="en" class="dark">"#));
        assert!(page.contains("contact-form"));
    }
}
