use std::env;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    /// Base URL of an optional upstream fleet API, e.g. `http://10.0.0.5:5000/api`.
    /// When unset the service runs entirely on local sample data.
    pub upstream_base_url: Option<String>,
    pub upstream_token: Option<String>,
    pub upstream_timeout: Duration,
    pub fleet_size: usize,
    pub sim_tick: Duration,
    /// Chance per tick that a bus re-rolls its status.
    pub status_flip_probability: f64,
    /// Fixed RNG seed for the fleet generator; unset means seeded from entropy.
    pub fleet_seed: Option<u64>,
    /// Artificial delay before booking confirmation, for demo parity with the
    /// old loading overlay. Zero disables it.
    pub simulated_latency: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            // The demo page expects the API on port 5000.
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "sheger-dev-secret".to_string()),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a number"),
            upstream_base_url: env::var("UPSTREAM_API_BASE")
                .ok()
                .map(|url| url.trim_end_matches('/').to_string()),
            upstream_token: env::var("UPSTREAM_API_TOKEN").ok(),
            upstream_timeout: Duration::from_millis(
                env::var("UPSTREAM_TIMEOUT_MS")
                    .unwrap_or_else(|_| "2000".to_string())
                    .parse()
                    .expect("UPSTREAM_TIMEOUT_MS must be a number"),
            ),
            fleet_size: env::var("FLEET_SIZE")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .expect("FLEET_SIZE must be a number"),
            sim_tick: Duration::from_millis(
                env::var("SIM_TICK_MS")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse()
                    .expect("SIM_TICK_MS must be a number"),
            ),
            status_flip_probability: env::var("STATUS_FLIP_PROBABILITY")
                .unwrap_or_else(|_| "0.03".to_string())
                .parse()
                .expect("STATUS_FLIP_PROBABILITY must be a number"),
            fleet_seed: env::var("FLEET_SEED")
                .ok()
                .map(|s| s.parse().expect("FLEET_SEED must be a number")),
            simulated_latency: Duration::from_millis(
                env::var("SIMULATED_LATENCY_MS")
                    .unwrap_or_else(|_| "0".to_string())
                    .parse()
                    .expect("SIMULATED_LATENCY_MS must be a number"),
            ),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
