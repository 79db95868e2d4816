use std::net::SocketAddr;
use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use axum::middleware;
use tokio::net::TcpListener;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sheger_transit_backend::{
    config::Config,
    entities::user::{User, UserRole},
    middleware::rate_limit::log_request,
    routes,
    sim::{engine::SimulatedFleet, SimParams},
    store::Store,
    upstream::{self, UpstreamClient},
    AppState,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheger_transit_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Starting server at {}", config.server_addr());

    // Optional upstream fleet API for the route catalog and bookings
    let upstream_client = UpstreamClient::from_config(&config).map(Arc::new);
    if upstream_client.is_none() {
        tracing::info!("No upstream API configured, serving the local catalog");
    }

    // Load the route catalog and build the in-memory store
    let catalog = upstream::load_catalog(upstream_client.as_deref()).await;
    let store = Arc::new(Store::new(catalog));

    // Seed admin account if not exists
    seed_admin(&store).await;

    // Start the fleet simulation
    let fleet = Arc::new(SimulatedFleet::new(
        SimParams {
            tick: config.sim_tick,
            status_flip_probability: config.status_flip_probability,
        },
        config.fleet_size,
        config.fleet_seed,
    ));
    tokio::spawn(fleet.clone().run());
    tracing::info!(fleet_size = config.fleet_size, "Fleet simulation running");

    // Create app state
    let state = AppState {
        config: config.clone(),
        store,
        fleet,
        upstream: upstream_client,
    };

    // Configure rate limiting: 100 requests per 60 seconds per IP
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(60)
            .burst_size(100)
            .finish()
            .unwrap(),
    );

    // Create router with middleware
    let app = routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(GovernorLayer::new(governor_config))
        .layer(middleware::from_fn(log_request));

    // Start server with socket address for rate limiting
    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}

/// Seed the admin account if it doesn't exist
async fn seed_admin(store: &Store) {
    let admin_email = "admin@shegertransit.com";

    if store.find_user_by_email(admin_email).await.is_some() {
        return;
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(b"admin123", &salt)
        .expect("Failed to hash admin password")
        .to_string();

    let admin = User::new(
        admin_email.to_string(),
        password_hash,
        "Admin".to_string(),
        UserRole::Admin,
    );
    store
        .insert_user(admin)
        .await
        .expect("Failed to create admin");
    tracing::info!("Admin account created: {}", admin_email);
}
