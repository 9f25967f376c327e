use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::{Once, OnceLock};
use tracing::{debug, info, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling, rolling::Rotation};
use tracing_subscriber::{
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

static INIT: Once = Once::new();
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub service_name: String,
    pub enable_console: bool,
    pub enable_file: bool,
    pub log_directory: String,
    pub enable_colors: bool,
    pub enable_thread_ids: bool,
    pub enable_file_line: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            service_name: "restaurant_payout".to_string(),
            enable_console: true,
            enable_file: true,
            log_directory: "logs".to_string(),
            enable_colors: true,
            enable_thread_ids: false,
            enable_file_line: false,
        }
    }
}

pub struct EnhancedLogger {
    config: LogConfig,
}

impl EnhancedLogger {
    pub fn new(config: LogConfig) -> Self {
        // Create log directory if it doesn't exist
        if config.enable_file {
            if let Err(e) = fs::create_dir_all(&config.log_directory) {
                eprintln!("Failed to create log directory: {e}");
            }
        }

        Self { config }
    }

    fn level(&self) -> Level {
        match self.config.level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    pub fn init(&self) {
        INIT.call_once(|| {
            let level = self.level();
            // The core crate logs through `log`; both targets share the level.
            let env_filter = EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
                format!(
                    "{}={level},restaurant_wallet_core={level},actix_web=info",
                    self.config.service_name
                )
            }));

            let mut layers: Vec<Box<dyn Layer<_> + Send + Sync>> = Vec::new();

            if self.config.enable_console {
                let console_layer = fmt::layer()
                    .with_timer(UtcTime::rfc_3339())
                    .with_thread_ids(self.config.enable_thread_ids)
                    .with_file(self.config.enable_file_line)
                    .with_line_number(self.config.enable_file_line)
                    .with_ansi(self.config.enable_colors)
                    .with_writer(std::io::stdout);
                layers.push(Box::new(console_layer));
            }

            if self.config.enable_file {
                let file_appender = rolling::RollingFileAppender::new(
                    Rotation::DAILY,
                    &self.config.log_directory,
                    format!("{}.log", self.config.service_name),
                );
                let (non_blocking_file_appender, guard) = non_blocking(file_appender);
                let _ = FILE_GUARD.set(guard);
                let file_layer = fmt::layer()
                    .with_timer(UtcTime::rfc_3339())
                    .with_thread_ids(self.config.enable_thread_ids)
                    .with_ansi(false)
                    .with_writer(non_blocking_file_appender);
                layers.push(Box::new(file_layer));
            }

            let subscriber = Registry::default().with(env_filter).with(layers);

            if let Err(e) = subscriber.try_init() {
                eprintln!("Logger already initialised: {e}");
            }
        });
    }
}

pub struct Logger;

impl Logger {
    pub fn init(log_level: &str) {
        let config = LogConfig {
            level: log_level.to_string(),
            ..LogConfig::default()
        };
        EnhancedLogger::new(config).init();
    }

    pub fn warn(message: &str) {
        warn!("{}", message);
    }

    pub fn debug(message: &str) {
        debug!("{}", message);
    }

    pub fn withdrawal_requested(request_id: &str, restaurant_id: &str, amount: Decimal) {
        info!(
            operation = "withdrawal_requested",
            request_id,
            restaurant_id,
            amount = %amount,
            "Withdrawal requested"
        );
    }

    pub fn withdrawal_approved(request_id: &str, admin_id: &str) {
        info!(operation = "withdrawal_approved", request_id, admin_id, "Withdrawal approved");
    }

    pub fn withdrawal_rejected(request_id: &str, admin_id: &str, refunded: Decimal) {
        info!(
            operation = "withdrawal_rejected",
            request_id,
            admin_id,
            refunded = %refunded,
            "Withdrawal rejected and refunded"
        );
    }

    pub fn notification_failed(recipient: &str, subject: &str, error: &str) {
        warn!(operation = "notification_failed", recipient, subject, error, "Notification delivery failed");
    }
}
