//! Popup demo server.
//!
//! Serves the builder on `/`, the shared demo on `/demo`, the share-link API
//! and the wasm bundle built from `crates/web`. Configuration comes from the
//! environment (see `config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use popup_demo_storefront::{app, config::StorefrontConfig, state::AppState, telemetry};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;

    // The Sentry client has to exist before its tracing layer is installed.
    let _sentry = telemetry::init_sentry(&config);
    telemetry::init_tracing();

    if !config.static_dir.is_dir() {
        warn!(
            dir = %config.static_dir.display(),
            "wasm bundle directory missing; pages will load without the widget host"
        );
    }

    let addr = config.socket_addr();
    let router = app(AppState::new(config))
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "popup demo listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

/// Resolve on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {},
        () = terminate => {},
    }
    info!("shutdown requested, draining connections");
}
