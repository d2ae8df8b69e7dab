//! Health check service.
//!
//! Reports whether the database answers a trivial query.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

/// Serving status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServingStatus {
    Serving,
    NotServing,
}

/// Health snapshot returned by `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: ServingStatus,
    pub database: String,
    pub server_time: DateTime<Utc>,
}

impl HealthReport {
    pub fn is_serving(&self) -> bool {
        self.status == ServingStatus::Serving
    }
}

pub struct HealthService {
    state: Arc<AppState>,
}

impl HealthService {
    pub fn new(state: Arc<AppState>) -> Self {
        HealthService { state }
    }

    pub async fn check(&self) -> HealthReport {
        let timeout = self.state.config.request_timeout();
        let reachable = matches!(
            tokio::time::timeout(timeout, self.state.db.health_check()).await,
            Ok(true)
        );

        let (status, database) = if reachable {
            (ServingStatus::Serving, "connected")
        } else {
            warn!("database health check failed");
            (ServingStatus::NotServing, "unreachable")
        };

        HealthReport {
            status,
            database: database.to_string(),
            server_time: Utc::now(),
        }
    }
}
