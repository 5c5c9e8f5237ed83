//! The execution collaborator seam.
//!
//! Tools never talk to a driver directly; they hand SQL text to an
//! `Executor` and get back the driver's raw result as JSON, in whatever
//! envelope that driver conventionally uses (`dialect::normalize` flattens
//! it). The trait is object-safe so tests can substitute a spy and so an
//! out-of-tree driver (Oracle, say) can be plugged in.

use crate::config::ConnectionProfile;
use crate::dialect::Engine;
use crate::error::{GatewayError, GatewayResult};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Executes one SQL statement against the configured database.
///
/// A single call is a single suspend point: no retries, no statement
/// splitting. Timeouts and cancellation are the implementation's concern.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, sql: &str) -> GatewayResult<JsonValue>;
}

/// Connect the bundled executor for the profile's engine.
pub async fn connect(profile: &ConnectionProfile) -> GatewayResult<Arc<dyn Executor>> {
    match profile.engine {
        Engine::Postgres | Engine::MySql | Engine::Sqlite => {
            Ok(Arc::new(super::SqlxExecutor::connect(profile).await?))
        }
        Engine::Mssql => Ok(Arc::new(super::MssqlExecutor::connect(profile).await?)),
        Engine::Oracle => Err(GatewayError::config(
            "no bundled Oracle driver; the dialect layer supports Oracle but execution \
             requires an external Executor implementation",
        )),
    }
}
