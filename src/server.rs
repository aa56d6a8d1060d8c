//! Reusable server runtime.
//!
//! [`ServerHandle`] owns the whole lifecycle: metrics recorder, in-memory
//! stores, notification worker, REST API and graceful shutdown. The CLI
//! binaries only load configuration and call [`ServerHandle::start`].

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{error, info, warn};

use crate::application::{
    BookingService, CatalogPolicy, CatalogService, IdentityService, IdentitySettings,
    NotificationDispatcher, Notifier,
};
use crate::config::AppConfig;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::crypto::password::hash_password;
use crate::infrastructure::storage::seed_services;
use crate::infrastructure::{
    InMemoryAppointmentRepository, InMemoryMenuItemRepository, InMemoryServiceRepository,
    LocalImageStore, LogNotifier, MailTemplates, SmtpNotifier,
};
use crate::interfaces::http::{create_api_router, AppState, RouterOptions};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

/// Base64 inflates payloads by 4/3; leave room for the JSON around them.
const BODY_LIMIT_SLACK: usize = 64 * 1024;

pub struct ServerOptions {
    pub config: AppConfig,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }
}

/// Handle to a running salon backend.
///
/// ```rust,no_run
/// use salon_booking::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub config: AppConfig,
    /// Port actually bound (differs from config when it was 0)
    pub api_port: u16,
    pub booking: Arc<BookingService>,
    pub catalog: Arc<CatalogService>,
    pub identity: Arc<IdentityService>,

    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

/// The global recorder can only be installed once per process, so a
/// restart within the same process reuses the first handle.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Prometheus recorder unavailable, /metrics disabled: {}", e);
                None
            }
        })
        .clone()
}

fn build_notifier(cfg: &AppConfig) -> Arc<dyn Notifier> {
    let templates = MailTemplates {
        business_name: cfg.frontend.business_name.clone(),
        password_reset_url: cfg.frontend.password_reset_url.clone(),
    };

    match &cfg.smtp {
        Some(smtp) => match SmtpNotifier::new(smtp, cfg.admin_recipient(), templates.clone()) {
            Ok(notifier) => {
                info!(host = %smtp.host, port = smtp.port, "SMTP notifier configured");
                Arc::new(notifier)
            }
            Err(e) => {
                error!("SMTP setup failed, falling back to log-only notifications: {}", e);
                Arc::new(LogNotifier::new(templates))
            }
        },
        None => {
            info!("No [smtp] section, notifications are logged only");
            Arc::new(LogNotifier::new(templates))
        }
    }
}

impl ServerHandle {
    /// Build every component from `opts.config`, bind the listener and
    /// start serving in the background.
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let cfg = opts.config;
        info!("Starting salon booking service...");

        if cfg.uses_dev_secrets() {
            warn!("Using built-in development JWT secrets; set security.jwt_secret and security.refresh_secret");
        }

        let metrics = prometheus_handle();

        let shutdown = ShutdownCoordinator::new(cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        // Stores
        let appointments = Arc::new(InMemoryAppointmentRepository::new(
            cfg.booking.daily_capacity,
        ));
        let services = Arc::new(InMemoryServiceRepository::new());
        let menu_items = Arc::new(InMemoryMenuItemRepository::new());

        if cfg.catalog.seed_defaults {
            let seeded = seed_services(services.as_ref()).await?;
            info!("Seeded {} default services", seeded);
        }

        let images = Arc::new(
            LocalImageStore::new(&cfg.uploads.dir, "uploads")
                .with_limits(cfg.uploads.max_image_bytes, cfg.uploads.thumbnail_width),
        );
        info!("Uploads stored under {}", cfg.uploads.dir.display());

        // Notifications
        let dispatcher =
            NotificationDispatcher::start(build_notifier(&cfg), shutdown_signal.clone());

        // Application services
        let booking = Arc::new(BookingService::new(
            appointments,
            services.clone(),
            dispatcher.clone(),
        ));
        let catalog = Arc::new(CatalogService::new(
            services,
            menu_items,
            images,
            CatalogPolicy {
                allowed_categories: cfg.catalog.allowed_categories.clone(),
                max_images_per_service: cfg.catalog.max_images_per_service,
            },
        ));

        let admin_hash = hash_password(&cfg.admin.password)?;
        let identity = Arc::new(IdentityService::new(
            IdentitySettings {
                admin_email: cfg.admin.email.clone(),
                access: JwtConfig::access(
                    cfg.security.jwt_secret.clone(),
                    cfg.security.access_token_minutes,
                ),
                refresh: JwtConfig::refresh(
                    cfg.security.refresh_secret.clone(),
                    cfg.security.refresh_token_days,
                ),
                reset_ttl: chrono::Duration::minutes(cfg.security.reset_token_minutes),
            },
            admin_hash,
            dispatcher,
        ));
        info!(
            "Admin session: {} min access tokens, {} day refresh tokens",
            cfg.security.access_token_minutes, cfg.security.refresh_token_days
        );

        // REST API
        let state = AppState {
            booking: booking.clone(),
            catalog: catalog.clone(),
            identity: identity.clone(),
            cookie_secure: cfg.security.cookie_secure,
            started_at: Arc::new(Instant::now()),
        };
        let upload_body_limit = cfg
            .catalog
            .max_images_per_service
            .saturating_mul(cfg.uploads.max_image_bytes)
            .saturating_mul(4)
            / 3
            + BODY_LIMIT_SLACK;
        let router = create_api_router(
            state,
            RouterOptions {
                cors_origins: cfg.cors.allowed_origins.clone(),
                uploads_dir: cfg.uploads.dir.clone(),
                upload_body_limit,
                metrics,
            },
        );

        let api_addr = format!("{}:{}", cfg.server.api_host, cfg.server.api_port);
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let api_port = listener.local_addr()?.port();
        info!("REST API listening on http://{}:{}", cfg.server.api_host, api_port);
        info!("Swagger UI available at http://{}:{}/docs/", cfg.server.api_host, api_port);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            config: cfg,
            api_port,
            booking,
            catalog,
            identity,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGTERM / SIGINT.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Non-blocking; pair with [`ServerHandle::wait`].
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Block until the API has stopped (after shutdown or on server error),
    /// bounded by `server.shutdown_timeout` once shutdown begins.
    pub async fn wait(self) {
        let signal = self.shutdown.signal();
        let mut api_task = self.api_task;

        tokio::select! {
            result = &mut api_task => {
                if let Err(e) = result {
                    error!("REST API task panicked: {}", e);
                }
                signal.trigger();
            }
            _ = signal.wait() => {
                info!("Waiting for in-flight requests to finish...");
                let drained = self
                    .shutdown
                    .run_with_timeout(async {
                        if let Err(e) = api_task.await {
                            error!("REST API task panicked: {}", e);
                        }
                    })
                    .await;
                if !drained {
                    warn!("Abandoning in-flight requests");
                }
            }
        }

        info!("Salon booking service stopped");
    }

    pub async fn shutdown(self) {
        info!("Shutting down...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Install the global tracing subscriber. Call once, before
/// [`ServerHandle::start`]. `RUST_LOG` wins over `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };
    if let Err(e) = result {
        eprintln!("tracing already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.server.api_host = "127.0.0.1".into();
        cfg.server.api_port = 0;
        cfg.server.shutdown_timeout = 2;
        cfg.uploads.dir = std::env::temp_dir().join(format!("salon-server-{}", uuid::Uuid::new_v4()));
        cfg
    }

    #[tokio::test]
    async fn starts_seeds_and_stops() {
        let handle = ServerHandle::start(ServerOptions {
            config: test_config(),
        })
        .await
        .unwrap();

        assert_ne!(handle.api_port, 0);
        assert!(handle.is_running());
        let services = handle
            .catalog
            .list_services(Default::default(), crate::shared::PageRequest::clamped(0, 100))
            .await
            .unwrap();
        assert!(services.total > 0);

        tokio::time::timeout(std::time::Duration::from_secs(5), handle.shutdown())
            .await
            .expect("shutdown hung");
    }
}
