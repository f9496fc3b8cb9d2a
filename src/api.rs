//! HTTP API endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

/// Response for the presence endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresenceResponse {
    pub participants: usize,
}

/// Current number of connected participants.
///
/// GET /api/presence
pub async fn presence(State(state): State<Arc<AppState>>) -> Json<PresenceResponse> {
    Json(PresenceResponse {
        participants: state.participant_count().await,
    })
}
