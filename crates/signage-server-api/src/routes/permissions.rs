// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission catalog handler.

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use signage_server_rbac::PermissionRecord;

use super::ApiState;
use crate::api_response::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ListPermissionsResponse {
	pub permissions: Vec<PermissionRecord>,
}

/// List the permission catalog.
#[tracing::instrument(skip(state))]
pub async fn list_permissions(
	State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
	let permissions = state.rbac.permissions.list().await?;
	Ok(Json(ListPermissionsResponse { permissions }))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::routes::test_support::*;
	use axum::http::{Method, StatusCode};
	use signage_server_rbac::{Permission, Seeder};

	#[tokio::test]
	async fn lists_standard_catalog_and_super_admin() {
		let app = test_app().await;
		let resp = app.as_admin(Method::GET, "/permissions", None).await;
		assert_status(&resp, StatusCode::OK);

		let body: ListPermissionsResponse = json(resp).await;
		assert_eq!(body.permissions.len(), Seeder::standard_catalog().count() + 1);
		assert!(body
			.permissions
			.iter()
			.any(|p| p.permission() == Permission::super_admin()));
	}
}
