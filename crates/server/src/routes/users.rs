//! Profile CRUD handlers.
//!
//! Every handler here takes [`RequireAuth`], so only callers holding a valid
//! bearer token reach the store.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Json, response::IntoResponse};
use serde::Deserialize;
use uuid::Uuid;

use userdir_core::{Email, ProfileId};

use crate::db::{
    MAX_PAGE_SIZE, NewProfile, ProfileChanges, ProfileListQuery, SortField, SortOrder,
};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::Profile;
use crate::state::AppState;

// =============================================================================
// Create
// =============================================================================

/// Profile creation payload. Missing fields validate like empty ones.
#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
}

/// `POST /users`
pub async fn create(
    RequireAuth(_identity): RequireAuth,
    State(state): State<AppState>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut violations = Vec::new();

    if req.name.trim().is_empty() {
        violations.push("Name is required".to_owned());
    }
    let email = Email::parse(&req.email)
        .map_err(|_| violations.push("Invalid Email".to_owned()))
        .ok();

    let Some(email) = email.filter(|_| violations.is_empty()) else {
        return Err(AppError::Validation(violations));
    };

    let profile = state
        .profiles()
        .create(NewProfile {
            id: ProfileId::generate(),
            name: req.name,
            email,
            phone: req.phone,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

// =============================================================================
// List
// =============================================================================

/// Raw list query parameters, parsed leniently so validation failures come
/// back as client-facing messages rather than a deserializer rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Turn raw query parameters into a validated store query.
fn parse_list_query(params: &ListParams) -> Result<ProfileListQuery, AppError> {
    let mut violations = Vec::new();
    let mut query = ProfileListQuery::default();

    if let Some(page) = &params.page {
        match page.parse::<u32>() {
            Ok(page) if page >= 1 => query.page = page,
            _ => violations.push("Page must be a positive integer".to_owned()),
        }
    }

    if let Some(limit) = &params.limit {
        match limit.parse::<u32>() {
            Ok(limit) if (1..=MAX_PAGE_SIZE).contains(&limit) => query.limit = limit,
            _ => violations.push(format!(
                "Limit must be a positive integer <= {MAX_PAGE_SIZE}"
            )),
        }
    }

    if let Some(sort_by) = &params.sort_by {
        match sort_by.parse::<SortField>() {
            Ok(field) => query.sort_by = field,
            Err(_) => violations.push("Invalid sort field".to_owned()),
        }
    }

    // Anything other than "desc" sorts ascending.
    if params.sort_order.as_deref() == Some("desc") {
        query.sort_order = SortOrder::Descending;
    }

    if violations.is_empty() {
        Ok(query)
    } else {
        Err(AppError::Validation(violations))
    }
}

/// `GET /users`
pub async fn list(
    RequireAuth(_identity): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Profile>>, AppError> {
    let query = parse_list_query(&params)?;
    let profiles = state.profiles().list(&query).await?;
    Ok(Json(profiles))
}

// =============================================================================
// Read, update, delete
// =============================================================================

/// `GET /users/{id}`
pub async fn show(
    RequireAuth(_identity): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Profile>, AppError> {
    let profile = state
        .profiles()
        .get(ProfileId::new(id))
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(profile))
}

/// Profile update payload. Absent fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// `PUT /users/{id}`
pub async fn update(
    RequireAuth(_identity): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let mut violations = Vec::new();

    if let Some(name) = &req.name
        && name.trim().is_empty()
    {
        violations.push("Name is required".to_owned());
    }

    let email = match &req.email {
        Some(raw) => Email::parse(raw)
            .map_err(|_| violations.push("Invalid Email".to_owned()))
            .ok(),
        None => None,
    };

    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let changes = ProfileChanges {
        name: req.name,
        email,
        phone: req.phone,
    };

    let profile = state
        .profiles()
        .update(ProfileId::new(id), changes)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(profile))
}

/// `DELETE /users/{id}`
pub async fn remove(
    RequireAuth(_identity): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state.profiles().delete(ProfileId::new(id)).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
