use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use portfolio_site::contact::email::ResendMailer;
use portfolio_site::route::SiteRouteSource;
use portfolio_site::server::{create_app, start_server, AppState};
use portfolio_site::settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("portfolio_site=info,tower_http=info")),
        )
        .init();

    println!("🚀 Starting portfolio site...");

    let settings = Settings::load().context("Failed to load settings")?;
    println!("📋 Config: {}", Settings::config_path().display());

    let mailer = ResendMailer::new(settings.resend_api_key.clone());
    if mailer.is_configured() {
        println!("✉️  Contact form relays to {}", settings.contact_to);
    } else {
        tracing::warn!("RESEND_API_KEY is not set; contact submissions will fail");
        println!("⚠️  RESEND_API_KEY not set, contact form cannot deliver mail");
    }

    let routes = SiteRouteSource::new(&settings.routes_dir)
        .context("Failed to build route HTTP client")?
        .with_remote_hosts(&settings.route_hosts);
    if routes.routes_dir().is_dir() {
        println!("🗺️  Route files: {}", routes.routes_dir().display());
    } else {
        tracing::warn!(
            "Routes directory {} does not exist; route maps will show placeholders",
            routes.routes_dir().display()
        );
    }

    if !routes.remote_hosts().is_empty() {
        println!("🌍 Remote route hosts: {}", routes.remote_hosts().join(", "));
    }

    let state = AppState::new(&settings, Arc::new(mailer), Arc::new(routes));
    let app = create_app(state, &settings.routes_dir);

    println!("🌐 Starting web server...");
    start_server(app, settings.host, settings.port).await?;

    println!("👋 Server stopped");
    Ok(())
}
