// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use super::Stores;
use crate::error::{RbacError, Result};
use crate::permission::{Permission, PermissionRecord, PermissionUpdate};
use crate::store::PermissionStore;
use crate::types::PermissionId;

/// Permission catalog management.
#[derive(Clone)]
pub struct PermissionService {
	permissions: Arc<dyn PermissionStore>,
}

impl PermissionService {
	pub fn new(stores: &Stores) -> Self {
		Self {
			permissions: stores.permissions.clone(),
		}
	}

	#[tracing::instrument(skip(self))]
	pub async fn list(&self) -> Result<Vec<PermissionRecord>> {
		Ok(self.permissions.list().await?)
	}

	#[tracing::instrument(skip(self), fields(permission_id = %id))]
	pub async fn get(&self, id: &PermissionId) -> Result<PermissionRecord> {
		self
			.permissions
			.find_by_id(id)
			.await?
			.ok_or_else(|| permission_not_found(id))
	}

	/// Create a permission from a resource/action pair.
	///
	/// # Errors
	///
	/// - [`RbacError::Validation`] if either part is empty or contains `:`
	/// - [`RbacError::Store`] with a conflict if the pair already exists
	#[tracing::instrument(skip(self))]
	pub async fn create(&self, resource: &str, action: &str) -> Result<PermissionRecord> {
		Permission::validate_parts(resource, action)?;
		let record = self.permissions.create(resource, action).await?;
		tracing::info!(permission_id = %record.id, "created permission");
		Ok(record)
	}

	#[tracing::instrument(skip(self, update), fields(permission_id = %id))]
	pub async fn update(
		&self,
		id: &PermissionId,
		update: PermissionUpdate,
	) -> Result<PermissionRecord> {
		let current = self.get(id).await?;
		Permission::validate_parts(
			update.resource.as_deref().unwrap_or(&current.resource),
			update.action.as_deref().unwrap_or(&current.action),
		)?;
		let record = self
			.permissions
			.update(id, &update)
			.await?
			.ok_or_else(|| permission_not_found(id))?;
		tracing::info!(permission = %record.permission(), "updated permission");
		Ok(record)
	}

	/// Delete a permission and its role assignments.
	#[tracing::instrument(skip(self), fields(permission_id = %id))]
	pub async fn delete(&self, id: &PermissionId) -> Result<()> {
		if !self.permissions.delete(id).await? {
			return Err(permission_not_found(id));
		}
		tracing::info!("deleted permission");
		Ok(())
	}
}

fn permission_not_found(id: &PermissionId) -> RbacError {
	RbacError::not_found(format!("Permission {id} not found"))
}
