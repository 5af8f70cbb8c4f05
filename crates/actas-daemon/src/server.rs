//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::config::{DaemonConfig, EmailConfig, StorageConfig};
use crate::error::{DaemonError, DaemonResult};
use actas_notify::{NoopNotifier, NotificationSender, SmtpNotifier};
use actas_signing::{SignatureWorkflow, SigningLinks};
use actas_storage::memory::InMemoryActaStore;
use actas_storage::postgres::PostgresActaStore;
use actas_storage::ActaStore;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Actas daemon server
pub struct Server {
    config: DaemonConfig,
    state: AppState,
}

impl Server {
    /// Create a new server with the given configuration
    pub async fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let store = build_store(&config.storage).await?;
        let notifier = build_notifier(&config.email)?;

        let workflow = SignatureWorkflow::new(
            store.clone(),
            notifier,
            SigningLinks::new(&config.signing.base_url),
        )
        .with_max_update_attempts(config.signing.max_update_attempts);

        let state = AppState::new(store, Arc::new(workflow));

        Ok(Self { config, state })
    }

    /// Run the server until a shutdown signal arrives
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;
        let app = create_router(self.state, self.config.server.enable_cors);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("actas daemon listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("actas daemon shutting down");

        Ok(())
    }
}

async fn build_store(config: &StorageConfig) -> DaemonResult<Arc<dyn ActaStore>> {
    match config {
        StorageConfig::Memory => {
            tracing::info!("using in-memory storage");
            Ok(Arc::new(InMemoryActaStore::new()))
        }
        StorageConfig::Postgres {
            url,
            max_connections,
            connect_timeout_secs,
        } => {
            tracing::info!("connecting to postgres storage");
            let store =
                PostgresActaStore::connect_with_options(url, *max_connections, *connect_timeout_secs)
                    .await?;
            Ok(Arc::new(store))
        }
    }
}

fn build_notifier(config: &EmailConfig) -> DaemonResult<Arc<dyn NotificationSender>> {
    match config {
        EmailConfig::Disabled => {
            tracing::info!("email delivery disabled; requests will be logged only");
            Ok(Arc::new(NoopNotifier))
        }
        EmailConfig::Smtp {
            host,
            port,
            username,
            password,
            use_tls,
            from_address,
            from_name,
        } => {
            let notifier = SmtpNotifier::new(
                host,
                *port,
                username.clone(),
                password.clone(),
                *use_tls,
                from_address,
                from_name.as_deref(),
            )
            .map_err(|e| DaemonError::Email(e.to_string()))?;
            tracing::info!(host = %host, "using SMTP email delivery");
            Ok(Arc::new(notifier))
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("received terminate signal, initiating graceful shutdown");
        }
    }
}
