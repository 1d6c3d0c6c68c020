// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User management HTTP handlers.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use serde::{Deserialize, Serialize};
use signage_server_rbac::{NewUser, Role, RoleId, User, UserId, UserUpdate};

use super::ApiState;
use crate::api_response::{parse_id, require_non_blank, ApiError};

#[derive(Debug, Serialize, Deserialize)]
pub struct ListUsersResponse {
	pub users: Vec<User>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserRolesResponse {
	pub roles: Vec<Role>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetUserRolesRequest {
	pub role_ids: Vec<String>,
}

#[tracing::instrument(skip(state))]
pub async fn list_users(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
	let users = state.rbac.users.list().await?;
	Ok(Json(ListUsersResponse { users }))
}

/// Create a user. New users are active unless `is_active` is false.
///
/// # Errors
/// - 400: empty email or a malformed body
/// - 409: email already registered
#[tracing::instrument(skip(state, body), fields(email = tracing::field::Empty))]
pub async fn create_user(
	State(state): State<ApiState>,
	body: Result<Json<NewUser>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
	let Json(body) = body?;
	tracing::Span::current().record("email", body.email.as_str());
	require_non_blank(&body.email, "Email")?;
	let user = state.rbac.users.create(body).await?;
	Ok((StatusCode::CREATED, Json(user)))
}

#[tracing::instrument(skip(state), fields(%id))]
pub async fn get_user(
	State(state): State<ApiState>,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
	let id: UserId = parse_id(&id, "user")?;
	Ok(Json(state.rbac.users.get(&id).await?))
}

#[tracing::instrument(skip(state, body), fields(%id))]
pub async fn update_user(
	State(state): State<ApiState>,
	Path(id): Path<String>,
	body: Result<Json<UserUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
	let id: UserId = parse_id(&id, "user")?;
	let Json(body) = body?;
	if let Some(email) = &body.email {
		require_non_blank(email, "Email")?;
	}
	Ok(Json(state.rbac.users.update(&id, body).await?))
}

#[tracing::instrument(skip(state), fields(%id))]
pub async fn delete_user(
	State(state): State<ApiState>,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
	let id: UserId = parse_id(&id, "user")?;
	state.rbac.users.delete(&id).await?;
	Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state), fields(%id))]
pub async fn get_user_roles(
	State(state): State<ApiState>,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
	let id: UserId = parse_id(&id, "user")?;
	let roles = state.rbac.users.get_user_roles(&id).await?;
	Ok(Json(UserRolesResponse { roles }))
}

/// Replace the user's role set. An empty list removes every role.
#[tracing::instrument(skip(state, body), fields(%id, count = tracing::field::Empty))]
pub async fn set_user_roles(
	State(state): State<ApiState>,
	Path(id): Path<String>,
	body: Result<Json<SetUserRolesRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
	let id: UserId = parse_id(&id, "user")?;
	let Json(body) = body?;
	tracing::Span::current().record("count", body.role_ids.len());
	let role_ids = body
		.role_ids
		.iter()
		.map(|raw| parse_id::<RoleId>(raw, "role"))
		.collect::<Result<Vec<_>, _>>()?;

	let roles = state.rbac.users.set_user_roles(&id, &role_ids).await?;
	Ok(Json(UserRolesResponse { roles }))
}
