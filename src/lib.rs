pub mod config;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod sim;
pub mod store;
pub mod upstream;
pub mod utils;

use std::sync::Arc;

use crate::sim::FleetFeed;
use crate::store::Store;
use crate::upstream::UpstreamClient;

pub use config::Config;
pub use error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<Store>,
    pub fleet: Arc<dyn FleetFeed>,
    pub upstream: Option<Arc<UpstreamClient>>,
}
