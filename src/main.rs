use tracing_subscriber::EnvFilter;

use united_kart_api::config::Settings;
use united_kart_api::{create_router, db, jobs, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let settings = Settings::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("United Kart API - Starting...");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&settings.database_url).await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;
    tracing::info!("Migrations completed successfully");

    let addr = settings.bind_address();
    let sweep_every = settings.coupon_expiry_sweep;
    let state = AppState::new(db_pool, settings);

    jobs::spawn_coupon_expiry_sweep(state.coupon_service.clone(), sweep_every);

    let app = create_router(state);

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("United Kart API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
