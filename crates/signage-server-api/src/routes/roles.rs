// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role management HTTP handlers.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use serde::{Deserialize, Serialize};
use signage_server_rbac::{
	NewRole, PermissionId, PermissionRecord, Role, RoleId, RoleUpdate, User,
};

use super::ApiState;
use crate::api_response::{parse_id, require_non_blank, ApiError};

#[derive(Debug, Serialize, Deserialize)]
pub struct ListRolesResponse {
	pub roles: Vec<Role>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RolePermissionsResponse {
	pub permissions: Vec<PermissionRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoleUsersResponse {
	pub users: Vec<User>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetRolePermissionsRequest {
	pub permission_ids: Vec<String>,
}

/// List all roles.
#[tracing::instrument(skip(state))]
pub async fn list_roles(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
	let roles = state.rbac.roles.list().await?;
	Ok(Json(ListRolesResponse { roles }))
}

/// Create a custom role.
///
/// # Errors
/// - 400: empty name or a malformed body
/// - 409: name clashes with a system role
#[tracing::instrument(skip(state, body), fields(name = tracing::field::Empty))]
pub async fn create_role(
	State(state): State<ApiState>,
	body: Result<Json<NewRole>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
	let Json(body) = body?;
	tracing::Span::current().record("name", body.name.as_str());
	require_non_blank(&body.name, "Role name")?;
	let role = state.rbac.roles.create(body).await?;
	Ok((StatusCode::CREATED, Json(role)))
}

#[tracing::instrument(skip(state), fields(%id))]
pub async fn get_role(
	State(state): State<ApiState>,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
	let id: RoleId = parse_id(&id, "role")?;
	Ok(Json(state.rbac.roles.get(&id).await?))
}

#[tracing::instrument(skip(state, body), fields(%id))]
pub async fn update_role(
	State(state): State<ApiState>,
	Path(id): Path<String>,
	body: Result<Json<RoleUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
	let id: RoleId = parse_id(&id, "role")?;
	let Json(body) = body?;
	if let Some(name) = &body.name {
		require_non_blank(name, "Role name")?;
	}
	Ok(Json(state.rbac.roles.update(&id, body).await?))
}

/// Delete a role. System roles are refused with 403.
#[tracing::instrument(skip(state), fields(%id))]
pub async fn delete_role(
	State(state): State<ApiState>,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
	let id: RoleId = parse_id(&id, "role")?;
	state.rbac.roles.delete(&id).await?;
	Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state), fields(%id))]
pub async fn get_role_permissions(
	State(state): State<ApiState>,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
	let id: RoleId = parse_id(&id, "role")?;
	let permissions = state.rbac.roles.get_role_permissions(&id).await?;
	Ok(Json(RolePermissionsResponse { permissions }))
}

/// Replace the role's permission set.
#[tracing::instrument(skip(state, body), fields(%id, count = tracing::field::Empty))]
pub async fn set_role_permissions(
	State(state): State<ApiState>,
	Path(id): Path<String>,
	body: Result<Json<SetRolePermissionsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
	let id: RoleId = parse_id(&id, "role")?;
	let Json(body) = body?;
	tracing::Span::current().record("count", body.permission_ids.len());
	let permission_ids = body
		.permission_ids
		.iter()
		.map(|raw| parse_id::<PermissionId>(raw, "permission"))
		.collect::<Result<Vec<_>, _>>()?;

	let permissions = state
		.rbac
		.roles
		.set_role_permissions(&id, &permission_ids)
		.await?;
	Ok(Json(RolePermissionsResponse { permissions }))
}

#[tracing::instrument(skip(state), fields(%id))]
pub async fn get_role_users(
	State(state): State<ApiState>,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
	let id: RoleId = parse_id(&id, "role")?;
	let users = state.rbac.roles.get_role_users(&id).await?;
	Ok(Json(RoleUsersResponse { users }))
}
