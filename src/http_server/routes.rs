//! Moderation HTTP Routes
//!
//! Thin handlers: extract the bearer credential and payload, call the
//! service, serialize the result.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Json, Path, State},
    http::{header::AUTHORIZATION, HeaderMap},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::moderation::{
    bearer_token, LoginRequest, ModerationError, ModerationResult, ModerationService, NewFlat,
    NewHouse, RegisterRequest,
};
use crate::store::{Flat, House, User};

/// Shared handler state
pub struct AppState {
    pub service: ModerationService,
}

impl AppState {
    pub fn new(service: ModerationService) -> Self {
        Self { service }
    }
}

/// Moderation routes with shared state
pub fn moderation_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/dummyLogin", post(dummy_login_handler))
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/house/create", post(create_house_handler))
        .route("/house/:id", get(list_flats_handler))
        .route("/house/:id/subscribe", post(subscribe_handler))
        .route("/flat/create", post(create_flat_handler))
        .route("/flat/update", post(update_flat_handler))
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct DummyLoginRequest {
    pub user_type: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    pub user_type: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFlatRequest {
    pub house_number: i64,
    pub flat_number: i64,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub user_type: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            user_type: user.role,
        }
    }
}

fn credential(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())).map(str::to_string)
}

/// Run a service call that takes the write gate, hashes a password or
/// writes the snapshot off the async workers
async fn blocking<T, F>(state: Arc<AppState>, f: F) -> ModerationResult<T>
where
    T: Send + 'static,
    F: FnOnce(&ModerationService) -> ModerationResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state.service))
        .await
        .map_err(|e| ModerationError::Internal(e.to_string()))?
}

// ==================
// Handlers
// ==================

async fn dummy_login_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DummyLoginRequest>, JsonRejection>,
) -> ModerationResult<Json<TokenResponse>> {
    let Json(request) = body?;
    let role: Role = request.user_type.parse()?;

    let token = state.service.dummy_login(role)?;
    Ok(Json(TokenResponse { token }))
}

async fn register_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RegisterBody>, JsonRejection>,
) -> ModerationResult<Json<UserResponse>> {
    let Json(body) = body?;
    let request = RegisterRequest {
        email: body.email,
        password: body.password,
        user_type: body.user_type.parse()?,
    };

    let user = blocking(state, move |service| service.register(request)).await?;
    Ok(Json(UserResponse::from(&user)))
}

async fn login_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ModerationResult<Json<TokenResponse>> {
    let Json(request) = body?;

    let token = blocking(state, move |service| service.login(request)).await?;
    Ok(Json(TokenResponse { token }))
}

async fn create_house_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<NewHouse>, JsonRejection>,
) -> ModerationResult<Json<House>> {
    let Json(request) = body?;
    let token = credential(&headers);

    let house = blocking(state, move |service| {
        service.create_house(token.as_deref(), request)
    })
    .await?;
    Ok(Json(house))
}

async fn create_flat_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<NewFlat>, JsonRejection>,
) -> ModerationResult<Json<Flat>> {
    let Json(request) = body?;
    let token = credential(&headers);

    let flat = blocking(state, move |service| {
        service.create_flat(token.as_deref(), request)
    })
    .await?;
    Ok(Json(flat))
}

async fn update_flat_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<UpdateFlatRequest>, JsonRejection>,
) -> ModerationResult<Json<Flat>> {
    let Json(request) = body?;
    let token = credential(&headers);

    let flat = blocking(state, move |service| {
        service.update_flat(
            token.as_deref(),
            request.house_number,
            request.flat_number,
            &request.status,
        )
    })
    .await?;
    Ok(Json(flat))
}

async fn list_flats_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    house: Result<Path<i64>, PathRejection>,
) -> ModerationResult<Json<Vec<Flat>>> {
    let Path(house_number) = house?;

    let flats = state
        .service
        .list_flats(credential(&headers).as_deref(), house_number)?;
    Ok(Json(flats))
}

async fn subscribe_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    house: Result<Path<i64>, PathRejection>,
) -> ModerationResult<Json<MessageResponse>> {
    let Path(house_number) = house?;

    state
        .service
        .subscribe(credential(&headers).as_deref(), house_number)?;
    Ok(Json(MessageResponse {
        message: "Subscribed successfully".to_string(),
    }))
}
