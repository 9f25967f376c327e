use actix_web::{web, App, HttpServer};
use std::sync::Arc;

use restaurant_payout::api;
use restaurant_payout::api::handlers::health::health;
use restaurant_payout::app::{WithdrawalService, WithdrawalServiceSettings};
use restaurant_payout::domain::auth::AuthManager;
use restaurant_payout::infrastructure::config::Config;
use restaurant_payout::infrastructure::logger::Logger;
use restaurant_payout::infrastructure::notification::{notifier_from_config, Notifier};
use restaurant_payout::infrastructure::storage::Storage;
use restaurant_payout::middleware::error_handling::{json_config, query_config};
use restaurant_payout::middleware::{build_cors, SecurityHeaders};

fn startup_error(what: &str, e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("{} failed: {}", what, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Configuration first so the logger honours LOG_LEVEL
    let config = match Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            return Err(startup_error("Configuration initialization", e));
        }
    };

    Logger::init(&config.log_level);
    tracing::info!("🚀 Starting Restaurant Payout Server...");
    tracing::info!(summary = %config.summary(), "✅ Configuration loaded successfully");

    let storage = match Storage::new(&config.database.data_dir) {
        Ok(storage) => {
            tracing::info!("✅ Storage initialized at {}", config.database.data_dir);
            Arc::new(storage)
        }
        Err(e) => {
            tracing::error!("❌ Failed to initialize storage: {}", e);
            return Err(startup_error("Storage initialization", e));
        }
    };

    let notifier: Arc<dyn Notifier> = match notifier_from_config(&config.notifications) {
        Ok(notifier) => {
            tracing::info!("✅ Notifier initialized successfully");
            Arc::from(notifier)
        }
        Err(e) => {
            tracing::error!("❌ Failed to initialize notifier: {}", e);
            return Err(startup_error("Notifier initialization", e));
        }
    };

    let auth_manager = AuthManager::from_config(&config.security);
    tracing::info!("✅ Auth manager initialized successfully");

    let withdrawal_service = Arc::new(WithdrawalService::new(
        storage.clone(),
        notifier,
        WithdrawalServiceSettings::from_config(&config),
    ));
    tracing::info!("✅ Withdrawal service initialized successfully");

    tracing::info!("🌐 Listening on {}:{}", config.host, config.port);
    tracing::info!("📊 Environment: {}", config.environment);

    let security = config.security.clone();
    let bind = (config.host.clone(), config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            .wrap(SecurityHeaders)
            .wrap(build_cors(&security))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(web::Data::new(Arc::clone(&storage)))
            .app_data(web::Data::new(Arc::clone(&withdrawal_service)))
            .app_data(web::Data::new(auth_manager.clone()))
            .service(health)
            .service(web::scope("/api").configure(api::configure))
    })
    .bind(bind)?
    .run()
    .await
}
