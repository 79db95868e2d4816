use rand::Rng;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::entities::route::{sample_routes, Route};

/// Client for the optional upstream fleet API. Every failure mode degrades
/// to `None`; callers fall back to local data and the caller of the service
/// never sees an error.
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl UpstreamClient {
    /// Built only when an upstream base URL is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let base_url = config.upstream_base_url.clone()?;
        match Client::builder().timeout(config.upstream_timeout).build() {
            Ok(client) => Some(Self {
                client,
                base_url,
                token: config.upstream_token.clone(),
            }),
            Err(e) => {
                tracing::warn!("Failed to build upstream HTTP client: {e}");
                None
            }
        }
    }

    /// Fetch the upstream catalog and reshape it into routes. `None` on any
    /// failure or an empty list.
    pub async fn fetch_routes(&self) -> Option<Vec<Route>> {
        let url = format!("{}/buses", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Upstream catalog unavailable: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Upstream catalog returned an error");
            return None;
        }
        let body: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Upstream catalog sent a malformed body: {e}");
                return None;
            }
        };

        let list = bus_list(&body)?;
        if list.is_empty() {
            tracing::warn!("Upstream catalog is empty");
            return None;
        }
        let mut rng = rand::thread_rng();
        Some(list.iter().map(|bus| reshape_route(bus, &mut rng)).collect())
    }

    /// Forward a booking upstream and return the id it assigned. `None` on
    /// any failure; the caller then assigns a local id.
    pub async fn create_booking<T: Serialize + ?Sized>(&self, payload: &T) -> Option<String> {
        let url = format!("{}/bookings", self.base_url);
        let mut request = self.client.post(&url).json(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Upstream booking failed, using local confirmation: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Upstream booking rejected, using local confirmation");
            return None;
        }
        let body: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Upstream booking sent a malformed body: {e}");
                return None;
            }
        };
        value_to_string(body.get("bookingId"))
    }
}

/// Load the catalog: the upstream when configured and healthy, the bundled
/// sample routes otherwise.
pub async fn load_catalog(upstream: Option<&UpstreamClient>) -> Vec<Route> {
    if let Some(client) = upstream {
        if let Some(routes) = client.fetch_routes().await {
            tracing::info!(count = routes.len(), "Loaded route catalog from upstream");
            return routes;
        }
    }
    sample_routes()
}

/// The upstream may send a bare array or wrap it under `data` or `buses`.
fn bus_list(body: &Value) -> Option<&Vec<Value>> {
    if let Some(list) = body.as_array() {
        return Some(list);
    }
    ["data", "buses"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_array))
}

/// Reshape one upstream record into a catalog route, defaulting every
/// missing field the way the booking page always has.
fn reshape_route<R: Rng>(bus: &Value, rng: &mut R) -> Route {
    let ac_field = bus.get("ac").and_then(Value::as_bool);
    Route {
        id: value_to_string(bus.get("id"))
            .or_else(|| value_to_string(bus.get("_id")))
            .unwrap_or_else(|| format!("r_{:x}", rng.r#gen::<u32>())),
        title: bus
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                let from = bus.get("from").and_then(Value::as_str).unwrap_or("From");
                let to = bus.get("to").and_then(Value::as_str).unwrap_or("To");
                format!("{from} ↔ {to}")
            }),
        price: bus
            .get("price")
            .and_then(Value::as_f64)
            .or_else(|| bus.get("fare").and_then(Value::as_f64))
            .unwrap_or(0.0),
        duration: bus
            .get("duration")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| value_to_string(bus.get("eta")).map(|eta| format!("{eta}m")))
            .unwrap_or_else(|| "N/A".to_string()),
        // An explicit type wins; otherwise only a present-and-true ac flag
        // counts as Luxury, even though ac itself defaults to true below.
        service: bus
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                if ac_field.unwrap_or(false) {
                    "Luxury".to_string()
                } else {
                    "Standard".to_string()
                }
            }),
        ac: ac_field.unwrap_or(true),
        departure: bus
            .get("departureTime")
            .and_then(Value::as_str)
            .unwrap_or("N/A")
            .to_string(),
        arrival: bus
            .get("arrivalTime")
            .and_then(Value::as_str)
            .unwrap_or("N/A")
            .to_string(),
    }
}

fn value_to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
