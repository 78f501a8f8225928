//! Health check aggregation.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Component health state.
#[derive(Debug)]
pub struct ComponentHealth {
    name: &'static str,
    healthy: AtomicBool,
    message: parking_lot::RwLock<Option<String>>,
}

impl ComponentHealth {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            healthy: AtomicBool::new(false),
            message: parking_lot::RwLock::new(None),
        }
    }

    pub fn set_healthy(&self) {
        self.healthy.store(true, Ordering::Relaxed);
        *self.message.write() = None;
    }

    pub fn set_unhealthy(&self, msg: impl Into<String>) {
        self.healthy.store(false, Ordering::Relaxed);
        *self.message.write() = Some(msg.into());
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn message(&self) -> Option<String> {
        self.message.read().clone()
    }
}

/// Aggregated health report.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub components: Vec<ComponentHealthReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealthReport {
    pub name: String,
    pub healthy: bool,
    pub message: Option<String>,
}

/// Global health registry.
///
/// `mailer` reflects the delivery channel; `captcha` is marked healthy at
/// startup when verification is disabled, since there is nothing to fail.
pub struct HealthRegistry {
    pub mailer: ComponentHealth,
    pub captcha: ComponentHealth,
}

impl HealthRegistry {
    pub const fn new() -> Self {
        Self {
            mailer: ComponentHealth::new("mailer"),
            captcha: ComponentHealth::new("captcha"),
        }
    }

    /// Generate a health report.
    pub fn report(&self) -> HealthReport {
        let components = vec![
            ComponentHealthReport {
                name: self.mailer.name().to_string(),
                healthy: self.mailer.is_healthy(),
                message: self.mailer.message(),
            },
            ComponentHealthReport {
                name: self.captcha.name().to_string(),
                healthy: self.captcha.is_healthy(),
                message: self.captcha.message(),
            },
        ];

        HealthReport {
            healthy: components.iter().all(|c| c.healthy),
            components,
        }
    }

    /// Check if the service can accept traffic.
    pub fn is_ready(&self) -> bool {
        self.mailer.is_healthy()
    }

    /// Check if the service is alive.
    pub fn is_alive(&self) -> bool {
        true // Service is running
    }
}

impl Default for HealthRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global health registry.
pub static HEALTH: std::sync::LazyLock<HealthRegistry> =
    std::sync::LazyLock::new(HealthRegistry::new);

/// Get the global health registry.
pub fn health() -> &'static HealthRegistry {
    &HEALTH
}
