use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::core::collaborators::Resources;
use crate::core::dispatcher::Dispatcher;
use crate::core::handlers::register_builtin_tools;
use crate::core::tools::ToolRegistry;
use crate::core::tools::catalog::builtin_definitions;
use crate::core::tracker::ExecutionTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Connected,
    Disconnected,
}

/// Field names are fixed by the health wire format: `redis` is the execution
/// store and `oracle` the profile database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceHealth {
    pub redis: ServiceStatus,
    pub oracle: ServiceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: String,
    pub services: ServiceHealth,
}

/// The built-in tool catalog wired to a set of collaborators.
pub struct Engine {
    dispatcher: Dispatcher,
    resources: Resources,
}

impl Engine {
    pub fn new(resources: Resources) -> Self {
        let mut registry = ToolRegistry::with_definitions(builtin_definitions());
        register_builtin_tools(&mut registry, &resources);
        let tracker = ExecutionTracker::new(resources.state.clone());
        Self {
            dispatcher: Dispatcher::new(Arc::new(registry), tracker),
            resources,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub async fn health(&self) -> HealthReport {
        let status = |ok: bool| {
            if ok {
                ServiceStatus::Connected
            } else {
                ServiceStatus::Disconnected
            }
        };
        HealthReport {
            status: "ok",
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            services: ServiceHealth {
                redis: status(self.resources.state.ping().await.is_ok()),
                oracle: status(self.resources.database.ping().await.is_ok()),
            },
        }
    }
}
