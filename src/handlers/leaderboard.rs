use crate::error::AppError;
use crate::models::leaderboard::*;
use crate::services::leaderboard as service;
use crate::AppState;
use ntex::web::{self, HttpResponse};
use std::sync::Arc;

/// Sheet fetches block on network or disk, so they run on the blocking pool.
async fn run_blocking<F, T>(state: &Arc<AppState>, f: F) -> Result<T, AppError>
where
    F: FnOnce(&AppState) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}

pub async fn get_leaderboard(
    state: web::types::State<Arc<AppState>>,
    query: web::types::Query<LeaderboardQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let response = run_blocking(&state, move |s| {
        service::get_leaderboard(s.source.as_ref(), &s.config, &query)
    })
    .await?;
    Ok(HttpResponse::Ok().json(&response))
}

pub async fn search_leaderboard(
    state: web::types::State<Arc<AppState>>,
    query: web::types::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let response = run_blocking(&state, move |s| {
        service::search_leaderboard(s.source.as_ref(), &s.config, &query)
    })
    .await?;
    Ok(HttpResponse::Ok().json(&response))
}

pub async fn get_header_label(
    state: web::types::State<Arc<AppState>>,
    query: web::types::Query<HeaderQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let label = run_blocking(&state, move |s| {
        service::get_header_label(s.source.as_ref(), &s.config, &query)
    })
    .await?;
    Ok(HttpResponse::Ok().json(&label))
}

pub async fn get_filters() -> HttpResponse {
    HttpResponse::Ok().json(&service::filter_options())
}
