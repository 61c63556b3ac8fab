// Server configuration
pub const DEFAULT_HOST: [u8; 4] = [127, 0, 0, 1];
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_ROUTES_DIR: &str = "routes";
pub const CONFIG_FILE_NAME: &str = "portfolio_site.ini";

// Contact pipeline
pub const DEFAULT_CONTACT_EMAIL: &str = "owner@example.com";
pub const DEFAULT_CONTACT_FROM: &str = "Portfolio Contact <onboarding@resend.dev>";
pub const RESEND_API_URL: &str = "https://api.resend.com/emails";
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

// Client form returns to idle this long after success or error
pub const FORM_RESET_DELAY_SECS: u64 = 5;

// Route rendering
pub const ROUTE_FIT_PADDING: u32 = 40;
pub const ROUTE_LINE_WIDTH: u32 = 3;
pub const ACCENT_COLOR: &str = "#FF6B00";
pub const START_MARKER_COLOR: &str = "#22c55e";
pub const PLACEHOLDER_ICON: &str = "🗺️";

// Remote route fetches
pub const ROUTE_FETCH_TIMEOUT_SECS: u64 = 10;
pub const MAX_ROUTE_BYTES: usize = 5 * 1024 * 1024;
