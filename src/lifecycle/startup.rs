//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the selected service from validated configuration
//! - Bind its listener
//! - Hook OS signals to graceful shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds last, once the service state is built

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{NewsroomConfig, ServiceKind};
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::Shutdown;

/// Run `service` until a shutdown signal arrives and in-flight requests drain.
pub async fn run_service(service: ServiceKind, config: NewsroomConfig) -> Result<(), ServerError> {
    let server = HttpServer::new(service, &config)?;

    let listener = TcpListener::bind(config.bind_address(service)).await?;
    tracing::info!(
        service = %service,
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    let signal_task = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { shutdown.trigger_on_signal().await })
    };

    let result = server.run(listener, server_shutdown).await;
    signal_task.abort();
    result
}
