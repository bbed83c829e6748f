//! User route handlers.
//!
//! Handlers stay thin: extract and validate input, run the explicit auth
//! pipeline where required, then delegate to the lifecycle service.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_cookies::{Cookie, Cookies};
use tracing::instrument;

use worko_core::UserId;

use crate::db::PgUserStore;
use crate::error::ApiError;
use crate::middleware::{ACCESS_TOKEN_COOKIE, Authenticated};
use crate::models::{CreateUser, PublicUser, UserDocument};
use crate::services::{Claims, Decision, UserService, UserServiceError, authorize};
use crate::state::AppState;

/// Second half of the auth pipeline: the verified subject must own the
/// target record.
fn require_owner(claims: &Claims, id: UserId) -> Result<(), ApiError> {
    match authorize(&claims.sub, &id.to_string()) {
        Decision::Allow => Ok(()),
        Decision::Deny => Err(ApiError::Forbidden("You are not authorized!".to_string())),
    }
}

/// Unpack a JSON body, turning deserialization failures into a 400.
fn require_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    Ok(body)
}

/// POST / - Create an account.
///
/// Public. On success the response carries the record's public view and an
/// HTTP-only `access_token` cookie holding the freshly minted credential.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    cookies: Cookies,
    payload: Result<Json<CreateUser>, JsonRejection>,
) -> Result<Json<PublicUser>, ApiError> {
    let input = require_body(payload)?
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let store = PgUserStore::new(state.pool());
    let service = UserService::new(&store, state.credentials());
    let (record, token) = service.create(input).await?;

    tracing::info!(user_id = %record.id, "user created");

    let mut cookie = Cookie::new(ACCESS_TOKEN_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookies.add(cookie);

    Ok(Json(record.into()))
}

/// GET /find/{id} - Fetch a single record.
///
/// Public. The 404 body is the bare string `"User not found"` rather than the
/// `{"error": …}` object every other error uses; clients depend on that
/// shape.
#[instrument(skip(state), fields(user_id = %id))]
pub async fn find(State(state): State<AppState>, Path(id): Path<UserId>) -> Response {
    let store = PgUserStore::new(state.pool());
    let service = UserService::new(&store, state.credentials());

    match service.read(id).await {
        Ok(record) => Json(PublicUser::from(record)).into_response(),
        Err(UserServiceError::NotFound) => {
            (StatusCode::NOT_FOUND, Json("User not found")).into_response()
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// GET /users - List every record.
///
/// Public, unfiltered, unpaginated.
#[instrument(skip_all)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>, ApiError> {
    let store = PgUserStore::new(state.pool());
    let service = UserService::new(&store, state.credentials());

    let records = service.list().await?;
    Ok(Json(records.into_iter().map(PublicUser::from).collect()))
}

/// PUT /{id} - Full replace.
///
/// Ownership-gated. Any schema field omitted from the body is reset, not
/// preserved.
#[instrument(skip(state, claims, payload), fields(user_id = %id))]
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Authenticated(claims): Authenticated,
    payload: Result<Json<UserDocument>, JsonRejection>,
) -> Result<Json<PublicUser>, ApiError> {
    require_owner(&claims, id)?;

    let doc = require_body(payload)?
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let store = PgUserStore::new(state.pool());
    let service = UserService::new(&store, state.credentials());
    let record = service.replace(id, &doc).await?;

    Ok(Json(record.into()))
}

/// PATCH /{id} - Partial update.
///
/// Ownership-gated. Only fields present in the body change.
#[instrument(skip(state, claims, payload), fields(user_id = %id))]
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Authenticated(claims): Authenticated,
    payload: Result<Json<UserDocument>, JsonRejection>,
) -> Result<Json<PublicUser>, ApiError> {
    require_owner(&claims, id)?;

    let doc = require_body(payload)?
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let store = PgUserStore::new(state.pool());
    let service = UserService::new(&store, state.credentials());
    let record = service.patch(id, &doc).await?;

    Ok(Json(record.into()))
}

/// DELETE /{id} - Delete the record.
///
/// Ownership-gated. Succeeds whether or not the record existed.
#[instrument(skip(state, claims), fields(user_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Authenticated(claims): Authenticated,
) -> Result<Json<&'static str>, ApiError> {
    require_owner(&claims, id)?;

    let store = PgUserStore::new(state.pool());
    let service = UserService::new(&store, state.credentials());
    service.delete(id).await?;

    Ok(Json("User has been deleted."))
}
