use std::sync::Arc;

use crate::contact::email::{EmailSender, Mailbox};
use crate::route::RouteSource;
use crate::settings::Settings;
use crate::theme::ThemeConfig;

// Shared, read-only per request. Both collaborators are stateless.
#[derive(Clone)]
pub struct AppState {
    pub mailer: Arc<dyn EmailSender>,
    pub mailbox: Arc<Mailbox>,
    pub routes: Arc<dyn RouteSource>,
    pub theme: ThemeConfig,
}

impl AppState {
    pub fn new(
        settings: &Settings,
        mailer: Arc<dyn EmailSender>,
        routes: Arc<dyn RouteSource>,
    ) -> Self {
        Self {
            mailer,
            mailbox: Arc::new(Mailbox {
                from: settings.contact_from.clone(),
                to: settings.contact_to.clone(),
            }),
            routes,
            theme: ThemeConfig::new(settings.theme, settings.system_prefers_dark),
        }
    }
}
