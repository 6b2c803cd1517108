//! Environment-driven configuration.

use instavid_events::webhook::WebhookConfig;
use serde::Serialize;

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// InstavidConfig
// ---------------------------------------------------------------------------

pub const ENVIRONMENT_DEVELOPMENT: &str = "development";
pub const ENVIRONMENT_STAGING: &str = "staging";
pub const ENVIRONMENT_PRODUCTION: &str = "production";

/// Integration configuration: widget assets, carousel defaults, and the
/// webhook delivery settings.
#[derive(Debug, Clone)]
pub struct InstavidConfig {
    /// Whether the storefront widget is enabled.
    pub widget_enabled: bool,
    /// Asset environment (`development`, `staging`, `production`).
    pub environment: String,
    /// Explicit widget JS URL; falls back to the per-environment default.
    pub js_url_override: Option<String>,
    /// Explicit widget CSS URL; falls back to the per-environment default.
    pub css_url_override: Option<String>,
    pub carousel_height: u32,
    pub carousel_autoplay: bool,
    pub carousel_loop: bool,
    /// Whether webhook delivery is enabled.
    pub webhook_enabled: bool,
    /// Base webhook endpoint URL.
    pub webhook_url: Option<String>,
}

/// Assembled widget configuration served to the storefront.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetConfig {
    pub enabled: bool,
    pub environment: String,
    pub urls: WidgetUrls,
    pub carousel: CarouselDefaults,
}

#[derive(Debug, Clone, Serialize)]
pub struct WidgetUrls {
    pub js: String,
    pub css: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CarouselDefaults {
    pub default_height: u32,
    pub default_autoplay: bool,
    pub default_loop: bool,
}

impl InstavidConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                   |
    /// |------------------------------|---------------------------|
    /// | `INSTAVID_WIDGET_ENABLED`    | `true`                    |
    /// | `INSTAVID_ENVIRONMENT`       | `development`             |
    /// | `INSTAVID_JS_URL`            | per-environment default   |
    /// | `INSTAVID_CSS_URL`           | per-environment default   |
    /// | `INSTAVID_CAROUSEL_HEIGHT`   | `594`                     |
    /// | `INSTAVID_CAROUSEL_AUTOPLAY` | `false`                   |
    /// | `INSTAVID_CAROUSEL_LOOP`     | `false`                   |
    /// | `INSTAVID_WEBHOOK_ENABLED`   | `false`                   |
    /// | `INSTAVID_WEBHOOK_URL`       | unset                     |
    pub fn from_env() -> Self {
        Self {
            widget_enabled: env_bool("INSTAVID_WIDGET_ENABLED", true),
            environment: std::env::var("INSTAVID_ENVIRONMENT")
                .unwrap_or_else(|_| ENVIRONMENT_DEVELOPMENT.into()),
            js_url_override: env_opt("INSTAVID_JS_URL"),
            css_url_override: env_opt("INSTAVID_CSS_URL"),
            carousel_height: std::env::var("INSTAVID_CAROUSEL_HEIGHT")
                .unwrap_or_else(|_| "594".into())
                .parse()
                .expect("INSTAVID_CAROUSEL_HEIGHT must be a valid u32"),
            carousel_autoplay: env_bool("INSTAVID_CAROUSEL_AUTOPLAY", false),
            carousel_loop: env_bool("INSTAVID_CAROUSEL_LOOP", false),
            webhook_enabled: env_bool("INSTAVID_WEBHOOK_ENABLED", false),
            webhook_url: env_opt("INSTAVID_WEBHOOK_URL"),
        }
    }

    /// Widget JS asset URL for the configured environment.
    pub fn js_url(&self) -> String {
        self.js_url_override
            .clone()
            .unwrap_or_else(|| default_js_url(&self.environment).to_string())
    }

    /// Widget CSS asset URL for the configured environment.
    pub fn css_url(&self) -> String {
        self.css_url_override
            .clone()
            .unwrap_or_else(|| default_css_url(&self.environment).to_string())
    }

    /// The dispatcher's view of this configuration.
    pub fn webhook_config(&self) -> WebhookConfig {
        WebhookConfig {
            enabled: self.webhook_enabled,
            endpoint: self.webhook_url.clone(),
        }
    }

    /// Assemble the full widget configuration payload.
    pub fn widget_config(&self) -> WidgetConfig {
        WidgetConfig {
            enabled: self.widget_enabled,
            environment: self.environment.clone(),
            urls: WidgetUrls {
                js: self.js_url(),
                css: self.css_url(),
            },
            carousel: CarouselDefaults {
                default_height: self.carousel_height,
                default_autoplay: self.carousel_autoplay,
                default_loop: self.carousel_loop,
            },
        }
    }
}

/// Built-in JS asset URL per environment; unknown environments fall back to
/// development.
fn default_js_url(environment: &str) -> &'static str {
    match environment {
        ENVIRONMENT_STAGING => "https://staging.instavid.com/short-videos/index.js",
        ENVIRONMENT_PRODUCTION => "https://cdn.instavid.com/short-videos/index.js",
        _ => "http://localhost:3000/short-videos/index.js",
    }
}

/// Built-in CSS asset URL per environment.
fn default_css_url(environment: &str) -> &'static str {
    match environment {
        ENVIRONMENT_STAGING => "https://staging.instavid.com/short-videos/index.css",
        ENVIRONMENT_PRODUCTION => "https://cdn.instavid.com/short-videos/index.css",
        _ => "http://localhost:3000/short-videos/index.css",
    }
}

fn env_opt(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.trim().is_empty())
}

fn env_bool(var: &str, default: bool) -> bool {
    match std::env::var(var) {
        Ok(value) => matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> InstavidConfig {
        InstavidConfig {
            widget_enabled: true,
            environment: ENVIRONMENT_DEVELOPMENT.into(),
            js_url_override: None,
            css_url_override: None,
            carousel_height: 594,
            carousel_autoplay: false,
            carousel_loop: false,
            webhook_enabled: false,
            webhook_url: None,
        }
    }

    #[test]
    fn asset_urls_follow_environment() {
        let mut c = config();
        assert!(c.js_url().starts_with("http://localhost:3000/"));
        c.environment = ENVIRONMENT_PRODUCTION.into();
        assert!(c.js_url().starts_with("https://cdn.instavid.com/"));
        assert!(c.css_url().ends_with("index.css"));
    }

    #[test]
    fn unknown_environment_falls_back_to_development_assets() {
        let mut c = config();
        c.environment = "qa".into();
        assert!(c.js_url().starts_with("http://localhost:3000/"));
    }

    #[test]
    fn explicit_urls_win_over_environment_defaults() {
        let mut c = config();
        c.js_url_override = Some("https://example.com/widget.js".into());
        assert_eq!(c.js_url(), "https://example.com/widget.js");
    }

    #[test]
    fn widget_config_carries_carousel_defaults() {
        let value = serde_json::to_value(config().widget_config()).unwrap();
        assert_eq!(value["carousel"]["default_height"], 594);
        assert_eq!(value["carousel"]["default_autoplay"], false);
        assert_eq!(value["urls"]["js"], "http://localhost:3000/short-videos/index.js");
    }
}
