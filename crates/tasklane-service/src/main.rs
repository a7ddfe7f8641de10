mod config;
mod handlers;
mod receiver;

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use tasklane_core::impls::{ConfigurationServiceFetcher, HttpEventSink, LocalResourceFetcher};
use tasklane_core::ports::ResourceFetcher;
use tasklane_core::session::Publisher;

use crate::config::{Config, LogFormat, ResourceSource};
use crate::receiver::ReceiverState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // (A) 設定を読む（不正な値はここで終了）
    let config = Config::from_env().context("invalid configuration")?;
    init_tracing(config.log_format);

    tracing::info!(
        service = config.service_name.as_str(),
        port = config.port,
        path = config.path.as_str(),
        namespace = config.namespace.as_str(),
        event_broker = config.event_broker_url.as_str(),
        "starting"
    );

    // (B) resource の取得元を選ぶ
    let fetcher: Arc<dyn ResourceFetcher> = match &config.resources {
        ResourceSource::Local { root } => {
            tracing::info!(root = %root.display(), "reading resources from the local filesystem");
            Arc::new(LocalResourceFetcher::new(root.clone()))
        }
        ResourceSource::ConfigurationService { url } => {
            tracing::info!(url = url.as_str(), "reading resources from the configuration service");
            Arc::new(ConfigurationServiceFetcher::new(url.as_str()))
        }
    };

    // (C) handler を登録して Router を凍結
    let router = handlers::build_router(fetcher).context("failed to build the handler registry")?;

    // (D) 発行先
    let sink = Arc::new(HttpEventSink::new(config.event_broker_url.as_str()));
    let publisher = Publisher::new(sink, config.namespace.as_str());

    // (E) HTTP receiver を起動（Ctrl-C / SIGTERM で graceful shutdown）
    let state = ReceiverState::new(router, publisher, &config.service_name);
    let app = receiver::app(&config.path, state);

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(err) => {
            tracing::warn!(error = %err, "cannot listen for SIGTERM; Ctrl-C only");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigterm.recv() => {},
    }
    tracing::info!("shutdown signal received");
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
