use crate::error::{AppError, Result};
use crate::model::{InfoQuery, InfoResponse, ShortenRequest, ShortenResponse};
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tinylink_core::{ShortCode, ShortenParams};

pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        AppError::validation(format!("invalid request body: {}", rejection.body_text()))
    })?;

    let link = state
        .shortener()
        .shorten(ShortenParams {
            original_url: request.url,
            expiration_in_minutes: request.expiration_in_minutes,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            shortlink: link.code().to_string(),
        }),
    ))
}

pub async fn info_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<InfoQuery>, QueryRejection>,
) -> Result<Json<InfoResponse>> {
    let Query(query) =
        query.map_err(|_| AppError::validation("missing shortlink query parameter"))?;
    let code = ShortCode::new(&query.shortlink).map_err(|e| AppError::validation(e.to_string()))?;

    let link = state.shortener().info(&code).await?;
    Ok(Json(link.into()))
}

pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response> {
    // anything that is not a well-formed code cannot be stored
    let Ok(code) = ShortCode::new(&code) else {
        return Err(AppError::not_found());
    };

    let target = state.shortener().resolve(&code).await?;
    Ok((StatusCode::FOUND, [(header::LOCATION, target)]).into_response())
}
