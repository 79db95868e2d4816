use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::entities::activity::ActivityEntry;
use crate::entities::bus::{Bus, BusStatus};
use crate::entities::fleet_route::FleetRoute;
use crate::error::AppResult;
use crate::sim::FleetStats;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FleetQuery {
    /// Filter to one route id.
    pub route: Option<String>,
    pub status: Option<BusStatus>,
    /// Free-text match over bus number, driver and route.
    pub q: Option<String>,
}

/// List the live fleet, optionally filtered
pub async fn list_buses(
    State(state): State<AppState>,
    Query(query): Query<FleetQuery>,
) -> AppResult<Json<Vec<Bus>>> {
    let mut buses = state.fleet.buses().await;

    if let Some(route) = &query.route {
        buses.retain(|b| &b.route == route);
    }
    if let Some(status) = query.status {
        buses.retain(|b| b.status == status);
    }
    if let Some(q) = &query.q {
        let needle = q.to_lowercase();
        buses.retain(|b| {
            b.number.to_lowercase().contains(&needle)
                || b.driver.to_lowercase().contains(&needle)
                || b.route.to_lowercase().contains(&needle)
        });
    }

    Ok(Json(buses))
}

/// Get one bus by id
pub async fn get_bus(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<Bus>> {
    Ok(Json(state.fleet.bus(id).await?))
}

/// The dashboard route definitions: polylines, colors and stops
pub async fn list_fleet_routes(State(state): State<AppState>) -> AppResult<Json<Vec<FleetRoute>>> {
    Ok(Json(state.fleet.routes().await))
}

/// Recent fleet activity, newest first
pub async fn activity(State(state): State<AppState>) -> AppResult<Json<Vec<ActivityEntry>>> {
    Ok(Json(state.fleet.activity().await))
}

/// Aggregate fleet counters
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<FleetStats>> {
    Ok(Json(state.fleet.stats().await))
}

/// Remove a bus from the fleet (admin)
pub async fn remove_bus(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<Value>> {
    let bus = state.fleet.remove_bus(id).await?;
    Ok(Json(json!({
        "message": format!("Bus {} has been removed from the system", bus.number)
    })))
}
