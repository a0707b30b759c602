//! AccountService — profile and ranking endpoints
//!
//! Endpoints:
//! - POST /starforge.AccountService/GetProfile
//! - POST /starforge.AccountService/UpdateProfile
//! - POST /starforge.AccountService/Ranking

use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::error::{EconomyError, EconomyResult};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/starforge.AccountService/GetProfile", post(get_profile))
        .route("/starforge.AccountService/UpdateProfile", post(update_profile))
        .route("/starforge.AccountService/Ranking", post(ranking))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct ProfileRequest {
    pub account_id: String,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub account_id: String,
    pub nickname: Option<String>,
    pub balance: f64,
    pub total_damage: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub account_id: String,
    pub nickname: String,
}

#[derive(Serialize)]
pub struct UpdateProfileResponse {
    pub message: &'static str,
}

#[derive(Deserialize)]
pub struct RankingRequest {
    /// Number of entries to return (clamped to 1..=100)
    #[serde(default = "default_ranking_limit")]
    pub limit: i64,
}

fn default_ranking_limit() -> i64 {
    20
}

#[derive(Serialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub account_id: String,
    pub nickname: Option<String>,
    pub total_damage: f64,
}

#[derive(Serialize)]
pub struct RankingResponse {
    pub entries: Vec<RankingEntry>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn get_profile(
    State(state): State<ApiState>,
    Json(req): Json<ProfileRequest>,
) -> EconomyResult<Json<ProfileResponse>> {
    let account = state
        .ledger
        .get_account(&req.account_id)
        .await?
        .ok_or_else(|| EconomyError::NotFound(format!("account {}", req.account_id)))?;

    Ok(Json(ProfileResponse {
        account_id: account.account_id,
        nickname: account.nickname,
        balance: account.balance,
        total_damage: account.total_damage,
        created_at: account.created_at,
    }))
}

async fn update_profile(
    State(state): State<ApiState>,
    Json(req): Json<UpdateProfileRequest>,
) -> EconomyResult<Json<UpdateProfileResponse>> {
    if req.nickname.trim().is_empty() {
        return Err(EconomyError::Validation("nickname is required".into()));
    }
    state
        .ledger
        .upsert_profile(&req.account_id, req.nickname.trim())
        .await?;

    Ok(Json(UpdateProfileResponse {
        message: "profile updated",
    }))
}

async fn ranking(
    State(state): State<ApiState>,
    Json(req): Json<RankingRequest>,
) -> EconomyResult<Json<RankingResponse>> {
    let limit = req.limit.clamp(1, 100);
    let rows = state.ledger.ranking(limit).await?;

    let entries = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| RankingEntry {
            rank: index + 1,
            account_id: row.account_id,
            nickname: row.nickname,
            total_damage: row.total_damage,
        })
        .collect();

    Ok(Json(RankingResponse { entries }))
}
