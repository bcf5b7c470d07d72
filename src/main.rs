use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kedai::infrastructure::AppState;
use kedai::{config, db, seed, server};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kedai=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();
    if config.uses_dev_jwt_secret() {
        if cfg!(debug_assertions) {
            tracing::warn!("JWT_SECRET not set, signing tokens with the development key");
        } else {
            tracing::error!("JWT_SECRET must be set in release builds");
            std::process::exit(1);
        }
    }

    let db = match db::init_db(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState::from_config(db.clone(), &config);

    if config.seed_demo {
        tracing::info!("Seeding demo data...");
        if let Err(e) = seed::seed_demo_data(&state).await {
            tracing::error!("Failed to seed demo data: {}", e);
        }
    } else if let Err(e) = seed::seed_locations(&db).await {
        tracing::error!("Failed to seed locations: {}", e);
    }

    let app = server::build_router(state, &config.cors_allowed_origins);
    if let Err(e) = server::serve(app, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
