//! Route handlers for the page and the JSON API.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::airdrop::requester::{AirdropError, AirdropReceipt};
use crate::http::server::AppState;
use crate::view::html::render_page;
use crate::view::model::ViewModel;
use crate::wallet::adapter::AdapterKind;
use crate::wallet::WalletError;

/// Error body: `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<WalletError> for ApiError {
    fn from(e: WalletError) -> Self {
        let status = match e {
            WalletError::UnknownAdapter(_) | WalletError::NoAdapterSelected => StatusCode::BAD_REQUEST,
            WalletError::Unavailable(_) | WalletError::InvalidKeypair(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        Self::new(status, e.to_string())
    }
}

impl From<AirdropError> for ApiError {
    fn from(e: AirdropError) -> Self {
        let status = match e {
            AirdropError::Busy => StatusCode::CONFLICT,
            AirdropError::NotConnected => StatusCode::PRECONDITION_FAILED,
            AirdropError::Disabled => StatusCode::FORBIDDEN,
            AirdropError::Failed(_) => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, e.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct AdapterEntry {
    pub kind: AdapterKind,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct WalletsResponse {
    pub adapters: Vec<AdapterEntry>,
    pub selected: Option<AdapterKind>,
    pub last_used: Option<AdapterKind>,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub adapter: AdapterKind,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConnectRequest {
    #[serde(default)]
    pub adapter: Option<AdapterKind>,
}

#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub identity: String,
    pub adapter: Option<AdapterKind>,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.dashboard.view_model()))
}

pub async fn get_state(State(state): State<AppState>) -> Json<ViewModel> {
    Json(state.dashboard.view_model())
}

pub async fn get_wallets(State(state): State<AppState>) -> Json<WalletsResponse> {
    let session = state.dashboard.session();
    Json(WalletsResponse {
        adapters: session
            .adapters()
            .into_iter()
            .map(|kind| AdapterEntry {
                kind,
                label: kind.label(),
            })
            .collect(),
        selected: session.selected(),
        last_used: session.last_used(),
    })
}

pub async fn select_wallet(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.dashboard.session().select(req.adapter)?;
    Ok(Json(json!({ "selected": req.adapter })))
}

/// The body is optional; without an adapter the selected one is used.
pub async fn connect_wallet(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ConnectResponse>, ApiError> {
    let req: ConnectRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ConnectRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, format!("Invalid body: {}", e)))?
    };

    let session = state.dashboard.session();
    let identity = match req.adapter {
        Some(kind) => session.connect_with(kind).await?,
        None => session.connect().await?,
    };

    Ok(Json(ConnectResponse {
        identity: identity.to_string(),
        adapter: session.selected(),
    }))
}

pub async fn disconnect_wallet(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.dashboard.session().disconnect().await;
    Json(json!({ "status": "disconnected" }))
}

/// Runs in its own task so a dropped client cannot cancel an airdrop
/// halfway through confirmation.
pub async fn request_airdrop(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<AirdropReceipt>), ApiError> {
    let dashboard = state.dashboard.clone();
    let result = tokio::spawn(async move { dashboard.airdrop().request().await })
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let receipt = result?;
    Ok((StatusCode::ACCEPTED, Json(receipt)))
}

pub async fn dismiss_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.dashboard.notifications().dismiss(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::new(StatusCode::NOT_FOUND, "Notification not found"))
    }
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let ledger = state.dashboard.ledger();
    let healthy = ledger.is_healthy().await;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(json!({
            "status": if healthy { "ok" } else { "degraded" },
            "cluster": ledger.cluster(),
            "phase": state.dashboard.supervisor().phase(),
            "active_pollers": state.dashboard.supervisor().active_pollers(),
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
