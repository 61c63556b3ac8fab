use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use super::RouteError;
use crate::constants::{MAX_ROUTE_BYTES, ROUTE_FETCH_TIMEOUT_SECS};

/// Where route bytes come from.
#[async_trait]
pub trait RouteSource: Send + Sync {
    async fn fetch(&self, route_url: &str) -> Result<Vec<u8>, RouteError>;
}

/// Serves the site's own `/routes/...` files from disk. Absolute
/// `http(s)://` URLs are fetched only from hosts on the remote allow-list,
/// which is empty by default.
pub struct SiteRouteSource {
    client: reqwest::Client,
    routes_dir: PathBuf,
    remote_hosts: Vec<String>,
}

impl SiteRouteSource {
    pub fn new(routes_dir: impl Into<PathBuf>) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(ROUTE_FETCH_TIMEOUT_SECS))
            // A redirect could lead off the allow-list
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            routes_dir: routes_dir.into(),
            remote_hosts: Vec::new(),
        })
    }

    /// Hosts (no scheme or port) that remote route URLs may point at.
    pub fn with_remote_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.remote_hosts = hosts
            .into_iter()
            .map(|h| h.as_ref().trim().to_ascii_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        self
    }

    pub fn remote_hosts(&self) -> &[String] {
        &self.remote_hosts
    }

    pub fn routes_dir(&self) -> &Path {
        &self.routes_dir
    }

    /// Maps `/routes/a/b.gpx`, `routes/a/b.gpx` or `a/b.gpx` into the routes
    /// directory. Anything that would escape it resolves to `None`.
    pub fn local_path(&self, route_url: &str) -> Option<PathBuf> {
        let path = route_url.split(['?', '#']).next().unwrap_or(route_url);
        let path = path.trim_start_matches('/');
        let relative = Path::new(path.strip_prefix("routes/").unwrap_or(path));

        if relative.as_os_str().is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.routes_dir.join(relative))
    }

    fn remote_allowed(&self, route_url: &str) -> bool {
        reqwest::Url::parse(route_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
            .is_some_and(|host| self.remote_hosts.iter().any(|allowed| *allowed == host))
    }

    async fn fetch_remote(&self, route_url: &str) -> Result<Vec<u8>, RouteError> {
        if !self.remote_allowed(route_url) {
            tracing::warn!("Refusing route fetch from unlisted host: {}", route_url);
            return Err(RouteError::NotFound(route_url.to_string()));
        }

        let transport_error = |e: reqwest::Error| {
            tracing::warn!("Route fetch {} failed: {}", route_url, e);
            RouteError::Fetch(route_url.to_string())
        };
        let too_large = || {
            tracing::warn!("Route file {} exceeds {} bytes", route_url, MAX_ROUTE_BYTES);
            RouteError::Fetch(route_url.to_string())
        };

        let mut response = self
            .client
            .get(route_url)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            tracing::debug!("Route fetch {} answered {}", route_url, response.status());
            return Err(RouteError::NotFound(route_url.to_string()));
        }
        if response
            .content_length()
            .is_some_and(|len| len > MAX_ROUTE_BYTES as u64)
        {
            return Err(too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(transport_error)? {
            if body.len() + chunk.len() > MAX_ROUTE_BYTES {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    async fn fetch_local(&self, route_url: &str) -> Result<Vec<u8>, RouteError> {
        let path = self
            .local_path(route_url)
            .ok_or_else(|| RouteError::NotFound(route_url.to_string()))?;

        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RouteError::NotFound(route_url.to_string()),
            _ => {
                tracing::warn!("Could not read route file {}: {}", path.display(), e);
                RouteError::Fetch(route_url.to_string())
            }
        })
    }
}

fn is_remote(route_url: &str) -> bool {
    let lower = route_url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[async_trait]
impl RouteSource for SiteRouteSource {
    async fn fetch(&self, route_url: &str) -> Result<Vec<u8>, RouteError> {
        if is_remote(route_url) {
            self.fetch_remote(route_url).await
        } else {
            self.fetch_local(route_url).await
        }
    }
}
