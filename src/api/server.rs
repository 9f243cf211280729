use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{MatchedPath, Request};
use axum::middleware::{Next, from_fn};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::instrument;

use crate::analysis::MockAnalyzer;
use crate::api::contract;
use crate::api::handler::*;
use crate::api::middleware;
use crate::db::prelude::{Storage, StoreError};
use crate::util::env::Env;

pub type JsonResult<T> = core::result::Result<Json<T>, RouteError>;

pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub analyzer: MockAnalyzer,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, analyzer: MockAnalyzer) -> Arc<Self> {
        Arc::new(Self { storage, analyzer })
    }
}

/// Builds the API router; every route is registered at the path its contract declares.
pub fn router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    for contract in contract::ALL.iter() {
        tracing::debug!(
            name = contract.name,
            method = %contract.method,
            path = contract.path,
            "registering route"
        );
    }

    Router::new()
        .route(&contract::USER_GET.route_path(), get(get_user))
        .route(&contract::USER_UPDATE.route_path(), patch(update_user))
        .route(&contract::ACTIVITIES_LIST.route_path(), get(list_activities))
        .route(&contract::CHALLENGES_DAILY.route_path(), get(daily_challenges))
        .route(&contract::CHALLENGES_COMPLETE.route_path(), post(complete_challenge))
        .route(&contract::BADGES_LIST.route_path(), get(list_badges))
        .route(&contract::LEADERBOARD_LIST.route_path(), get(leaderboard))
        .route(&contract::UPLOAD_TEST.route_path(), post(upload_test))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
                let method = req.method();
                let uri = req.uri();

                let matched_path = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|matched| matched.as_str());

                let contract = contract::find(method, uri.path()).map(|c| c.name);

                tracing::debug_span!("api_request", ?method, ?uri, ?matched_path, ?contract)
            }),
        )
        .layer(from_fn(log_route_errors))
        .layer(middleware::cors(cors_origins))
        .with_state(state)
}

/// Logs any `RouteError` a handler attached to its response, and flags responses whose status
/// the matching contract never declared.
#[instrument(skip(request, next), fields(uri = request.uri().to_string()))]
async fn log_route_errors(request: Request, next: Next) -> Response {
    let contract = contract::find(request.method(), request.uri().path());
    let res = next.run(request).await;
    let status = res.status();

    if let Some(err) = res.extensions().get::<Arc<RouteError>>() {
        if status.is_server_error() {
            tracing::error!(error = ?err, %status, "error occurred inside route handler");
        } else {
            tracing::warn!(error = %err, %status, "request rejected");
        }
    }

    if let Some(contract) = contract {
        match contract.status_shape(status) {
            Some(shape) => tracing::trace!(contract = contract.name, ?shape, "contract served"),
            None if !status.is_server_error() => tracing::warn!(
                contract = contract.name,
                input = ?contract.input,
                %status,
                "response status not declared by contract"
            ),
            None => {}
        }
    }

    res
}

#[instrument(skip(env, state), fields(port = env.server_api_port))]
pub async fn serve(env: &Env, state: Arc<AppState>) -> std::io::Result<()> {
    let app = router(state, &env.cors_allow_origins);

    let socket_addr = SocketAddr::new(env.server_bind_addr, env.server_api_port);
    let listener = TcpListener::bind(socket_addr).await?;

    let local_addr = listener.local_addr()?;
    tracing::info!(
        server_url = &format!("http://{local_addr}"),
        "server ready"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("received ctrl-c, shutting down"),
            Err(e) => {
                tracing::error!(error = ?e, "unable to listen for ctrl-c");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = ?e, "unable to listen for SIGTERM");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid request payload: {0}")]
    Validation(String),

    #[error("no challenge with id '{0}'")]
    ChallengeNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

const CHALLENGE_NOT_FOUND: &str = "Challenge not found";

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            message: String,
        }

        let (status, message) = match &self {
            RouteError::Validation(reason) => (StatusCode::BAD_REQUEST, reason.to_owned()),

            RouteError::ChallengeNotFound(_)
            | RouteError::Store(StoreError::ChallengeNotFound(_)) => {
                (StatusCode::NOT_FOUND, String::from(CHALLENGE_NOT_FOUND))
            }
        };

        let mut response = (status, Json(ErrorResponse { message })).into_response();
        response.extensions_mut().insert(Arc::new(self));

        response
    }
}
