use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    middleware,
    routing::{get, post},
};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oauth2_session::{
    GitHubProvider, SqlUserStore, UserStore, connect_cache_store, connect_data_store,
};
use oauth2_session_axum::{
    AUTH_ROUTE_PREFIX, AuthConfig, AuthCoordinator, auth_router, require_auth,
};

mod handlers;
mod server;
mod telemetry;
mod transcode;

use crate::{
    handlers::{MAX_UPLOAD_SIZE, index, upload},
    server::spawn_http_server,
    telemetry::{OTLP_ENDPOINT_ENV, Telemetry},
    transcode::{AvifTranscoder, ImageTranscoder},
};

const DEFAULT_PORT: u16 = 8000;

#[derive(Clone, FromRef)]
pub(crate) struct AppState {
    pub(crate) auth: AuthCoordinator,
    pub(crate) transcoder: Arc<dyn ImageTranscoder>,
}

pub(crate) fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            require_auth,
        ));

    Router::new()
        .merge(protected)
        .nest(AUTH_ROUTE_PREFIX.as_str(), auth_router(state.auth.clone()))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let telemetry = Telemetry::from_env()?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}=debug,oauth2_session=debug,tower_http=info",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            telemetry
                .as_ref()
                .map(|t| tracing_opentelemetry::layer().with_tracer(t.tracer())),
        )
        .init();

    match &telemetry {
        Some(t) => tracing::info!("Exporting traces to {}", t.endpoint()),
        None => tracing::debug!("{} not set, trace export disabled", OTLP_ENDPOINT_ENV),
    }

    let config = AuthConfig::from_env()?;
    tracing::debug!("Loaded {:?}", config);

    let cache = connect_cache_store(&config.cache_store_url).await?;
    let data_store = connect_data_store(&config.data_store_type, &config.data_store_url).await?;
    let users = Arc::new(SqlUserStore::new(data_store));
    users.init().await?;

    let provider = Arc::new(GitHubProvider::new(&config)?);
    let state = AppState {
        auth: AuthCoordinator::new(cache, users, provider),
        transcoder: Arc::new(AvifTranscoder::default()),
    };

    let port = match std::env::var("PORT") {
        Ok(port) => port.parse::<u16>()?,
        Err(_) => DEFAULT_PORT,
    };

    let outcome: Result<(), Box<dyn std::error::Error>> = tokio::select! {
        joined = spawn_http_server(port, app(state)) => match joined {
            Ok(served) => served.map_err(Into::into),
            Err(e) => Err(e.into()),
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
            Ok(())
        }
    };

    if let Some(telemetry) = telemetry {
        telemetry.shutdown();
    }
    outcome
}
