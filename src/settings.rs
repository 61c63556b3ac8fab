use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_CONTACT_EMAIL, DEFAULT_CONTACT_FROM, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_ROUTES_DIR,
};
use crate::theme::ThemePreference;

#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub host: [u8; 4],
    pub port: u16,
    pub routes_dir: PathBuf,
    /// Hosts that absolute route URLs may be fetched from. Empty means
    /// only files under `routes_dir` are served.
    pub route_hosts: Vec<String>,
    pub contact_to: String,
    pub contact_from: String,
    pub theme: ThemePreference,
    pub system_prefers_dark: bool,
    // Only ever read from the environment, never written to the config file
    #[serde(skip)]
    pub resend_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            routes_dir: PathBuf::from(DEFAULT_ROUTES_DIR),
            route_hosts: Vec::new(),
            contact_to: DEFAULT_CONTACT_EMAIL.to_string(),
            contact_from: DEFAULT_CONTACT_FROM.to_string(),
            theme: ThemePreference::System,
            system_prefers_dark: true,
            resend_api_key: None,
        }
    }
}

impl Settings {
    /// Loads the config file (writing defaults on first run), then applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        let mut settings = if config_path.exists() {
            Self::from_file(&config_path)?
        } else {
            let defaults = Settings::default();
            if let Err(e) = defaults.save_to(&config_path) {
                tracing::warn!("Could not write default config {}: {}", config_path.display(), e);
            }
            defaults
        };

        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).context("Failed to open config file")?;
        let reader = BufReader::new(file);
        let mut config_map = HashMap::new();

        for line in reader.lines() {
            let line = line.context("Failed to read line from config")?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(
                    key.trim().to_string(),
                    value.trim().trim_matches('"').to_string(),
                );
            }
        }

        let mut settings = Settings::default();
        settings.apply(|key| config_map.get(key).cloned());
        Ok(settings)
    }

    /// Environment variables win over the config file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("RESEND_API_KEY") {
            self.resend_api_key = Some(key);
        }
        if let Some(to) = non_empty("CONTACT_EMAIL") {
            self.contact_to = to;
        }
        if let Some(from) = non_empty("CONTACT_FROM") {
            self.contact_from = from;
        }
        if let Some(port) = non_empty("PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(dir) = non_empty("ROUTES_DIR") {
            self.routes_dir = PathBuf::from(dir);
        }
        if let Some(hosts) = non_empty("ROUTE_HOSTS") {
            self.route_hosts = parse_list(&hosts);
        }
        if let Some(theme) = non_empty("SITE_THEME") {
            self.theme = ThemePreference::from_stored(Some(&theme));
        }
    }

    fn apply<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = get("host").and_then(|h| parse_host(&h)) {
            self.host = host;
        }
        if let Some(port) = get("port").and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(dir) = get("routes_dir") {
            self.routes_dir = PathBuf::from(dir);
        }
        if let Some(hosts) = get("route_hosts") {
            self.route_hosts = parse_list(&hosts);
        }
        if let Some(to) = get("contact_to") {
            self.contact_to = to;
        }
        if let Some(from) = get("contact_from") {
            self.contact_from = from;
        }
        if let Some(theme) = get("theme") {
            self.theme = ThemePreference::from_stored(Some(&theme));
        }
        if let Some(dark) = get("system_prefers_dark").and_then(|d| d.parse::<bool>().ok()) {
            self.system_prefers_dark = dark;
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Creating config directory")?;
        }

        let mut content = String::new();
        content.push_str("# Portfolio site configuration\n");
        content.push_str("# RESEND_API_KEY is read from the environment only\n");
        content.push_str(&format!("host = {}\n", format_host(self.host)));
        content.push_str(&format!("port = {}\n", self.port));
        content.push_str(&format!("routes_dir = \"{}\"\n", self.routes_dir.display()));
        content.push_str(&format!("route_hosts = {}\n", self.route_hosts.join(", ")));
        content.push_str(&format!("contact_to = {}\n", self.contact_to));
        content.push_str(&format!("contact_from = \"{}\"\n", self.contact_from));
        content.push_str(&format!("theme = {}\n", self.theme.as_str()));
        content.push_str(&format!("system_prefers_dark = {}\n", self.system_prefers_dark));

        std::fs::write(config_path, content).context("Failed to write to config file")?;
        Ok(())
    }

    /// `portfolio_site.ini` beside the deployed binary. Under `cargo run`
    /// the binary sits in `target/{debug,release}`, so the file resolves to
    /// the project root instead, next to `routes/` and `frontend/`.
    pub fn config_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::config_path_in(&exe_dir)
    }

    fn config_path_in(exe_dir: &Path) -> PathBuf {
        let base = if exe_dir.ends_with("target/debug") || exe_dir.ends_with("target/release") {
            exe_dir.ancestors().nth(2).unwrap_or(exe_dir)
        } else {
            exe_dir
        };
        base.join(CONFIG_FILE_NAME)
    }
}

fn parse_host(value: &str) -> Option<[u8; 4]> {
    let parts: Vec<u8> = value
        .split('.')
        .map(|p| p.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    parts.try_into().ok()
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn format_host(host: [u8; 4]) -> String {
    format!("{}.{}.{}.{}", host[0], host[1], host[2], host[3])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let settings = Settings {
            host: [0, 0, 0, 0],
            port: 8080,
            routes_dir: PathBuf::from("public/routes"),
            route_hosts: vec!["cdn.example.com".to_string(), "maps.example.org".to_string()],
            contact_to: "me@example.org".to_string(),
            theme: ThemePreference::Light,
            system_prefers_dark: false,
            resend_api_key: Some("re_secret".to_string()),
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("re_secret"));

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded.host, [0, 0, 0, 0]);
        assert_eq!(loaded.port, 8080);
        assert_eq!(loaded.routes_dir, PathBuf::from("public/routes"));
        assert_eq!(loaded.route_hosts, ["cdn.example.com", "maps.example.org"]);
        assert_eq!(loaded.contact_to, "me@example.org");
        assert_eq!(loaded.contact_from, DEFAULT_CONTACT_FROM);
        assert_eq!(loaded.theme, ThemePreference::Light);
        assert!(!loaded.system_prefers_dark);
        assert_eq!(loaded.resend_api_key, None);
    }

    #[test]
    fn config_lives_at_project_root_during_development() {
        assert_eq!(
            Settings::config_path_in(Path::new("/work/site/target/debug")),
            PathBuf::from("/work/site").join(CONFIG_FILE_NAME)
        );
        assert_eq!(
            Settings::config_path_in(Path::new("/opt/portfolio")),
            PathBuf::from("/opt/portfolio").join(CONFIG_FILE_NAME)
        );
    }

    #[test]
    fn comments_and_garbage_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "# comment\n\nport = not-a-port\nhost = 1.2.3\n").unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded.port, DEFAULT_PORT);
        assert_eq!(loaded.host, DEFAULT_HOST);
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut settings = Settings::default();
        let env: HashMap<&str, &str> = [
            ("RESEND_API_KEY", "re_123"),
            ("CONTACT_EMAIL", "inbox@example.net"),
            ("PORT", "4000"),
            ("SITE_THEME", "dark"),
            ("ROUTE_HOSTS", "a.example.com, ,b.example.com"),
            ("CONTACT_FROM", "  "),
        ]
        .into_iter()
        .collect();

        settings.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.resend_api_key.as_deref(), Some("re_123"));
        assert_eq!(settings.contact_to, "inbox@example.net");
        assert_eq!(settings.port, 4000);
        assert_eq!(settings.theme, ThemePreference::Dark);
        assert_eq!(settings.route_hosts, ["a.example.com", "b.example.com"]);
        assert_eq!(settings.contact_from, DEFAULT_CONTACT_FROM);
    }

    #[test]
    fn missing_contact_email_falls_back_to_default() {
        let mut settings = Settings::default();
        settings.apply_env(|_| None);
        assert_eq!(settings.contact_to, DEFAULT_CONTACT_EMAIL);
        assert!(settings.resend_api_key.is_none());
        assert!(settings.route_hosts.is_empty());
    }
}
