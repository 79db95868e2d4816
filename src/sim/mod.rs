pub mod engine;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::activity::ActivityEntry;
use crate::entities::bus::Bus;
use crate::entities::fleet_route::FleetRoute;
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetStats {
    pub total_buses: usize,
    pub active_buses: usize,
    pub last_update: DateTime<Utc>,
}

/// Simulation knobs, filled from [`crate::config::Config`].
#[derive(Debug, Clone, Copy)]
pub struct SimParams {
    pub tick: Duration,
    pub status_flip_probability: f64,
}

/// Source of live fleet data. The HTTP layer only talks to this trait, so
/// the bundled simulation can be swapped for a real vehicle feed.
#[async_trait]
pub trait FleetFeed: Send + Sync {
    async fn buses(&self) -> Vec<Bus>;
    async fn bus(&self, id: u32) -> AppResult<Bus>;
    async fn routes(&self) -> Vec<FleetRoute>;
    async fn activity(&self) -> Vec<ActivityEntry>;
    async fn stats(&self) -> FleetStats;
    async fn remove_bus(&self, id: u32) -> AppResult<Bus>;
}
