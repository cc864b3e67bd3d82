//! HTTP front end for the gateway
//!
//! Keeps the JSON shapes of the original web service:
//! `GET /get_cities` and `POST /find_path` with `from`/`to` form fields.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use pathgate_config::GatewayConfig;
use pathgate_core::CITIES;
use pathgate_gateway::{Gateway, PathResult};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Form body of `POST /find_path`
#[derive(Debug, Deserialize)]
pub struct FindPathForm {
    pub from: String,
    pub to: String,
}

/// Response body of `POST /find_path`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FindPathResponse {
    Success {
        from: String,
        to: String,
        path: Vec<String>,
        distances: Vec<u64>,
        total_distance: u64,
    },
    Error {
        message: String,
    },
}

impl FindPathResponse {
    fn from_result(result: PathResult, from: String, to: String) -> Self {
        match result {
            PathResult::Success {
                path,
                hop_distances,
                total_distance,
            } => FindPathResponse::Success {
                from,
                to,
                path,
                distances: hop_distances,
                total_distance,
            },
            PathResult::NoPath { message } => FindPathResponse::Error { message },
            PathResult::Failure { reason, .. } => FindPathResponse::Error {
                message: format!("Error running pathfinding algorithm: {reason}"),
            },
        }
    }
}

/// Response body of `GET /get_cities`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitiesResponse {
    pub cities: Vec<String>,
}

pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/get_cities", get(get_cities))
        .route("/find_path", post(find_path))
        .with_state(gateway)
}

async fn get_cities() -> Json<CitiesResponse> {
    Json(CitiesResponse {
        cities: CITIES.iter().map(|city| (*city).to_string()).collect(),
    })
}

async fn find_path(
    State(gateway): State<Arc<Gateway>>,
    Form(form): Form<FindPathForm>,
) -> Json<FindPathResponse> {
    let result = gateway.find_path(&form.from, &form.to).await;
    Json(FindPathResponse::from_result(result, form.from, form.to))
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(addr: SocketAddr, config: &GatewayConfig) -> eyre::Result<()> {
    let gateway = Arc::new(Gateway::new(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "pathgate listening");

    axum::serve(listener, router(gateway))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutting down");
            }
        })
        .await?;

    Ok(())
}
