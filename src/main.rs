use dotenvy::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use tracing::{error, info, warn};

use civic_reports::config::Settings;
use civic_reports::database::schema;
use civic_reports::state::AppState;
use civic_reports::web;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("config error: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(settings).await {
        error!("server stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    info!("Connecting to database: {}", settings.database_url);
    let options = SqliteConnectOptions::from_str(&settings.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    schema::migrate(&pool).await?;

    info!(
        max_reporting_distance_m = settings.geofence.max_reporting_distance_m,
        duplicate_window_days = settings.duplicates.window.num_days(),
        duplicate_proximity_m = settings.duplicates.proximity_m,
        duplicate_policy = ?settings.duplicates.policy,
        "report checks configured"
    );

    let state = AppState::new(pool, settings.geofence.clone(), settings.duplicates.clone())?;
    let app = web::router(state);

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let fallback: SocketAddr =
                format!("{}:{}", settings.host, settings.port.saturating_add(1)).parse()?;
            warn!(
                "Could not bind {}: {}. Trying fallback {}",
                addr, e, fallback
            );
            tokio::net::TcpListener::bind(fallback).await?
        }
    };

    info!("🚀 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
