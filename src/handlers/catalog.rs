use axum::{extract::State, Json};

use crate::entities::route::Route;
use crate::error::AppResult;
use crate::upstream::load_catalog;
use crate::AppState;

/// List the bookable route catalog. The booking page expects a bare array.
pub async fn list_routes(State(state): State<AppState>) -> AppResult<Json<Vec<Route>>> {
    Ok(Json(state.store.catalog().await))
}

/// Re-fetch the catalog from the upstream, falling back to the bundled
/// sample routes (admin)
pub async fn refresh_catalog(State(state): State<AppState>) -> AppResult<Json<Vec<Route>>> {
    let routes = load_catalog(state.upstream.as_deref()).await;
    state.store.replace_catalog(routes.clone()).await;
    Ok(Json(routes))
}
