//! Contact Relay
//!
//! Intake service for a portfolio site's contact form:
//! - Fixed-window rate limiting per client address
//! - Field validation with aggregated errors
//! - Optional CAPTCHA verification gate
//! - Email notification via Resend, with a log-only dev fallback

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use api::state::{CaptchaClient, ContactConfig};
use api::{router, AppState};
use mailer::{Mailer, NoopMailer, ResendConfig, ResendMailer};
use telemetry::{health, init_tracing_from_env};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Destination mailbox for contact notifications
    #[serde(default = "default_contact_email")]
    contact_email: String,

    /// Sender display address
    #[serde(default = "default_from_email")]
    from_email: String,

    /// Resend credential; absent disables live delivery (submissions are
    /// logged and still accepted)
    #[serde(default)]
    resend_api_key: Option<String>,

    /// CAPTCHA shared secret; absent disables the verification gate
    #[serde(default)]
    recaptcha_secret: Option<String>,

    /// CAPTCHA verify endpoint
    #[serde(default = "default_verify_url")]
    recaptcha_verify_url: String,

    /// Trust score below this rejects a verified submission
    #[serde(default = "default_min_score")]
    captcha_min_score: f32,

    #[serde(default)]
    rate_limit: RateLimitSettings,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct RateLimitSettings {
    /// Window length in milliseconds
    #[serde(default = "default_window_ms")]
    window_ms: u64,
    /// Max submissions per window
    #[serde(default = "default_max_requests")]
    max_requests: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_contact_email() -> String {
    "hello@example.com".to_string()
}

fn default_from_email() -> String {
    "Contact Form <onboarding@resend.dev>".to_string()
}

fn default_verify_url() -> String {
    "https://www.google.com/recaptcha/api/siteverify".to_string()
}

fn default_min_score() -> f32 {
    0.5
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_max_requests() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            contact_email: default_contact_email(),
            from_email: default_from_email(),
            resend_api_key: None,
            recaptcha_secret: None,
            recaptcha_verify_url: default_verify_url(),
            captcha_min_score: default_min_score(),
            rate_limit: RateLimitSettings::default(),
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max_requests: default_max_requests(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting contact relay v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;

    let delivery_enabled = config.resend_api_key.is_some();
    let verification_enabled = config.recaptcha_secret.is_some();

    info!(
        delivery_enabled,
        verification_enabled,
        rate_limit_max = config.rate_limit.max_requests,
        rate_limit_window_ms = config.rate_limit.window_ms,
        "Loaded configuration"
    );

    // Build the mailer
    let mailer: Arc<dyn Mailer> = match &config.resend_api_key {
        Some(api_key) => Arc::new(
            ResendMailer::new(ResendConfig::new(api_key))
                .context("Failed to create Resend mailer")?,
        ),
        None => {
            info!("No delivery credential configured; submissions will be logged only");
            Arc::new(NoopMailer)
        }
    };

    // Build the verification client
    let captcha = CaptchaClient::new(
        config.recaptcha_secret.clone().unwrap_or_default(),
        config.recaptcha_verify_url.clone(),
    );

    check_health(&mailer);

    // Create application state
    let state = AppState::with_rate_limit(
        mailer,
        captcha,
        ContactConfig {
            verification_enabled,
            delivery_enabled,
            contact_email: config.contact_email.clone(),
            from_email: config.from_email.clone(),
            captcha_min_score: config.captcha_min_score,
        },
        api::middleware::rate_limit::RateLimitConfig {
            window: std::time::Duration::from_millis(config.rate_limit.window_ms),
            max_requests: config.rate_limit.max_requests,
        },
    );

    // Start rate limiter cleanup background task
    let _rate_limiter_cleanup = state.start_rate_limiter_cleanup();
    info!("Started rate limiter cleanup task (every 5 minutes)");

    // Create router
    let app = router(state);

    // Start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("RELAY")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // The deployment platform sets these as flat names, so accept them
    // directly alongside the RELAY__* forms
    if let Ok(api_key) = std::env::var("RESEND_API_KEY") {
        config.resend_api_key = Some(api_key);
    }
    if let Ok(from_email) = std::env::var("RESEND_FROM_EMAIL") {
        config.from_email = from_email;
    }
    if let Ok(contact_email) = std::env::var("CONTACT_EMAIL") {
        config.contact_email = contact_email;
    }
    if let Ok(secret) = std::env::var("RECAPTCHA_SECRET_KEY") {
        config.recaptcha_secret = Some(secret);
    }

    Ok(config)
}

/// Record component health on startup.
fn check_health(mailer: &Arc<dyn Mailer>) {
    if mailer.is_healthy() {
        health().mailer.set_healthy();
    } else {
        health().mailer.set_unhealthy("Mailer unavailable");
    }

    // No probe exists for the verify endpoint; healthy until a call fails
    health().captcha.set_healthy();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
