//! Incident reporting API server binary.
//!
//! Loads configuration (failing fast on a missing or weak signing secret),
//! selects an identity store and serves the REST API.

use std::sync::Arc;

use clap::Parser;
use incident_core::identity::{IdentityStore, MemoryIdentityStore, PgIdentityStore};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "incident_api_server", about = "Incident reporting API server")]
struct Args {
    /// Port to listen on; overrides the port in `BIND_ADDR`.
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// PostgreSQL connection URL. Without it principals live in memory.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Email of the foreman created when the identity store is empty.
    #[arg(long, env = "INCIDENT_BOOTSTRAP_EMAIL")]
    bootstrap_email: Option<String>,

    /// Password of the bootstrap foreman.
    #[arg(long, env = "INCIDENT_BOOTSTRAP_PASSWORD", hide_env_values = true)]
    bootstrap_password: Option<String>,

    /// Workplace reference of the bootstrap foreman.
    #[arg(long, env = "INCIDENT_BOOTSTRAP_WORKPLACE", default_value = "default")]
    bootstrap_workplace: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,incident_api=debug,incident_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    // Configuration errors (e.g. no signing secret) abort startup here.
    let mut config = incident_api::config::ApiConfig::from_env()?;
    if let Some(port) = args.port {
        let host = config
            .bind_addr
            .rsplit_once(':')
            .map_or(config.bind_addr.as_str(), |(host, _)| host);
        config.bind_addr = format!("{host}:{port}");
    }

    let identities: Arc<dyn IdentityStore> = match &args.database_url {
        Some(url) => {
            info!(max_connections = args.max_connections, "connecting to PostgreSQL");
            let pool = PgPoolOptions::new()
                .max_connections(args.max_connections)
                .acquire_timeout(std::time::Duration::from_secs(30))
                .connect(url)
                .await?;
            info!("running database migrations");
            incident_core::migrate::migrate(&pool).await?;
            Arc::new(PgIdentityStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set; principals are kept in memory and lost on exit");
            Arc::new(MemoryIdentityStore::new())
        }
    };

    match (&args.bootstrap_email, &args.bootstrap_password) {
        (Some(email), Some(password)) => {
            incident_api::services::auth::bootstrap(
                identities.as_ref(),
                email,
                password,
                &args.bootstrap_workplace,
            )
            .await?;
        }
        (Some(_), None) | (None, Some(_)) => {
            warn!("bootstrap needs both INCIDENT_BOOTSTRAP_EMAIL and INCIDENT_BOOTSTRAP_PASSWORD; skipping");
        }
        (None, None) => {}
    }

    let state = incident_api::AppState::new(identities, config.clone());
    let app = incident_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, ttl_secs = config.token_ttl.num_seconds(), "REST API listening");

    axum::serve(listener, app).await?;

    Ok(())
}
