use dotenvy::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::env;
use std::str::FromStr;

use civic_reports::database::schema;
use civic_reports::services::seed_service;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let Ok(db_url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL must be set (e.g. in .env)");
        std::process::exit(2);
    };

    let pool = match SqliteConnectOptions::from_str(&db_url) {
        Ok(options) => SqlitePoolOptions::new()
            .connect_with(options.create_if_missing(true))
            .await,
        Err(e) => Err(e),
    };
    let pool = match pool {
        Ok(p) => p,
        Err(e) => {
            eprintln!("cannot connect to {}: {}", db_url, e);
            std::process::exit(1);
        }
    };

    let result = match schema::migrate(&pool).await {
        Ok(()) => seed_service::seed_locations(&pool).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => {
            println!(
                "location seed: inserted={}, skipped={}",
                report.inserted, report.skipped
            );
        }
        Err(e) => {
            eprintln!("location seed failed: {}", e);
            std::process::exit(1);
        }
    }
}
