use std::sync::Arc;
use std::time::Instant;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{debug, info};

use crate::{
    config::{Config, Environment},
    db::Database,
    errors::AppError,
    limiter::RateLimiter,
    middleware::{RateLimit, REFILL_INTERVAL, REQUESTS_PER_MINUTE},
    repositories::GuestbookRepository,
    routes,
    services::{GuestbookService, VisitorService},
    types::AppState,
};

// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;

// Setup logging with custom format and configuration
fn setup_logging(config: &Config) -> Result<(), AppError> {
    // Configure log level based on environment and config
    let log_level = match config.app.environment {
        Environment::Development => config.app.log_level.clone(),
        Environment::Testing => "debug,actix_web=info".to_string(),
        Environment::Production => "info,actix_web=warn".to_string(),
    };

    let env = Env::default()
        .filter_or("RUST_LOG", log_level)
        .write_style_or("RUST_LOG_STYLE", "always");

    env_logger::try_init_from_env(env)
        .map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))
}

pub async fn server() -> AppResult<()> {
    // Load application configuration
    let config = Config::load()?;

    // Setup enhanced logging based on configuration
    setup_logging(&config)?;

    // Capture start time for uptime calculation
    let start_time = Instant::now();

    // Log startup information
    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {:?}", config.app.environment);
    info!(
        "Binding to {}:{} with {} workers",
        config.server.host, config.server.port, config.server.workers
    );
    info!(
        "Rate limit: {} requests per {:?} per client IP",
        REQUESTS_PER_MINUTE, REFILL_INTERVAL
    );

    if config.app.environment == Environment::Development {
        debug!("Debug logging enabled");
        debug!("Full configuration: {:?}", config);
    }

    // Connect to the database and run migrations
    let db = Database::connect(&config.db).await?;

    // One limiter shared by every worker; buckets are created lazily per IP
    let limiter = RateLimiter::new(REQUESTS_PER_MINUTE, REFILL_INTERVAL);

    // Periodically evict idle buckets so the registry does not grow with
    // every IP ever seen
    {
        let limiter = limiter.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(REFILL_INTERVAL);
            loop {
                tick.tick().await;
                limiter.sweep_idle();
            }
        });
    }

    // Shared state and services are built once, outside the app factory, so
    // all workers see the same counters and repositories
    let app_state = web::Data::new(AppState {
        start_time,
        db: db.clone(),
        version: config.app.version.clone(),
    });
    let guestbook_service = web::Data::new(GuestbookService::new(Arc::new(
        GuestbookRepository::new(db.clone()),
    )));
    let visitor_service = web::Data::new(VisitorService::new());

    // Determine if we should enable more verbose logging
    let enable_debug_logging = config.app.environment != Environment::Production;

    // Determine log format based on environment
    let log_format = if enable_debug_logging {
        "%a \"%r\" %s %b %T \"%{Referer}i\" \"%{User-Agent}i\""
    } else {
        "%a \"%r\" %s %b %T"
    };

    // Start the HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(guestbook_service.clone())
            .app_data(visitor_service.clone())
            // Gate every route through the limiter; Logger is registered
            // after it so rejected requests still show up in the access log
            .wrap(RateLimit::new(limiter.clone()))
            .wrap(Logger::new(log_format))
            .configure(routes::configure_routes)
    })
    .workers(config.server.workers)
    .bind((config.server.host.to_string(), config.server.port))?
    .run()
    .await?;

    db.shutdown().await;

    Ok(())
}
