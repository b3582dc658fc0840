mod api;
mod middleware;

use std::{sync::Arc, time::Duration};

use adlens_adlib::{Analyzer, MemoryAnalysisCache};
use adlens_apify::{ApifyClient, JobOrchestrator, PollPolicy};
use adlens_searchapi::{SearchApiClient, SearchApiError};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(adlens_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let apify = ApifyClient::from_config(&config)?;
    let orchestrator = JobOrchestrator::new(Arc::new(apify), PollPolicy::from_config(&config));
    let cache = MemoryAnalysisCache::new(
        config.cache_capacity,
        Duration::from_secs(config.cache_ttl_secs),
    );
    let analyzer = Analyzer::new(orchestrator, Arc::new(cache), config.default_scrape.clone());

    let search = match SearchApiClient::from_config(&config) {
        Ok(client) => Some(Arc::new(client)),
        Err(SearchApiError::MissingApiKey) => {
            tracing::warn!("SEARCHAPI_KEY not set; advertiser suggestions disabled");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let state = AppState {
        analyzer: Arc::new(analyzer),
        search,
    };
    let app = build_app(state, RateLimitState::from_config(&config));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "adlens server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
