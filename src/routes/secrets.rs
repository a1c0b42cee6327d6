use anyhow::anyhow;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    record::ShareRecord,
    sharing::{self, ReconstructionError, ReconstructionRequest},
};

use super::{ApiError, RouterState};

pub fn secrets_router() -> Router<RouterState> {
    Router::new().route("/reconstruct", post(reconstruct_secret))
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ReconstructedSecretResponse {
    /// Decimal representation, the secret may not fit in any JSON number
    pub secret: String,
    pub threshold: u32,
}

async fn reconstruct_secret(
    State(state): State<RouterState>,
    payload: Result<Json<ShareRecord>, JsonRejection>,
) -> Result<Json<ReconstructedSecretResponse>, ApiError> {
    let Json(record) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request =
        ReconstructionRequest::try_from(record).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let threshold = request.threshold;
    if threshold > state.max_threshold {
        return Err(ApiError::BadRequest(format!(
            "threshold {threshold} exceeds the maximum of {}",
            state.max_threshold
        )));
    }

    let secret = tokio::task::spawn_blocking(move || sharing::reconstruct(&request))
        .await
        .map_err(|e| anyhow!("reconstruction task failed: {e}"))??;

    info!(threshold, "secret reconstructed");

    Ok(Json(ReconstructedSecretResponse {
        secret: secret.to_string(),
        threshold,
    }))
}

impl From<ReconstructionError> for ApiError {
    fn from(err: ReconstructionError) -> Self {
        let kind = match err {
            ReconstructionError::InvalidThreshold | ReconstructionError::Decode { .. } => {
                return ApiError::BadRequest(err.to_string());
            }
            ReconstructionError::InsufficientPoints { .. } => "insufficient_points",
            ReconstructionError::DuplicateAbscissa(_) => "duplicate_abscissa",
            ReconstructionError::NonIntegralSecret { .. } => "non_integral_secret",
        };
        ApiError::UnprocessableEntity {
            kind,
            message: err.to_string(),
        }
    }
}
