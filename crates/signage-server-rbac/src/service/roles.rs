// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use super::{unique_ids, Stores};
use crate::error::{RbacError, Result};
use crate::permission::PermissionRecord;
use crate::role::{NewRole, Role, RoleUpdate};
use crate::store::{PermissionStore, RolePermissionStore, RoleStore, UserRoleStore, UserStore};
use crate::types::{PermissionId, RoleId, UserId};
use crate::user::User;

/// Role CRUD, permission assignment and membership projection.
#[derive(Clone)]
pub struct RoleService {
	roles: Arc<dyn RoleStore>,
	users: Arc<dyn UserStore>,
	permissions: Arc<dyn PermissionStore>,
	user_roles: Arc<dyn UserRoleStore>,
	role_permissions: Arc<dyn RolePermissionStore>,
}

impl RoleService {
	pub fn new(stores: &Stores) -> Self {
		Self {
			roles: stores.roles.clone(),
			users: stores.users.clone(),
			permissions: stores.permissions.clone(),
			user_roles: stores.user_roles.clone(),
			role_permissions: stores.role_permissions.clone(),
		}
	}

	#[tracing::instrument(skip(self))]
	pub async fn list(&self) -> Result<Vec<Role>> {
		Ok(self.roles.list().await?)
	}

	#[tracing::instrument(skip(self), fields(role_id = %id))]
	pub async fn get(&self, id: &RoleId) -> Result<Role> {
		self
			.roles
			.find_by_id(id)
			.await?
			.ok_or_else(|| role_not_found(id))
	}

	/// Create a role. `description` defaults to none and `is_system` to false.
	#[tracing::instrument(skip(self, input), fields(name = %input.name))]
	pub async fn create(&self, input: NewRole) -> Result<Role> {
		let role = self.roles.create(&input).await?;
		tracing::info!(role_id = %role.id, is_system = role.is_system, "created role");
		Ok(role)
	}

	#[tracing::instrument(skip(self, update), fields(role_id = %id))]
	pub async fn update(&self, id: &RoleId, update: RoleUpdate) -> Result<Role> {
		let role = self
			.roles
			.update(id, &update)
			.await?
			.ok_or_else(|| role_not_found(id))?;
		tracing::info!("updated role");
		Ok(role)
	}

	/// Delete a role.
	///
	/// # Errors
	///
	/// - [`RbacError::NotFound`] if the role does not exist
	/// - [`RbacError::Forbidden`] if it is a system role; nothing is deleted
	#[tracing::instrument(skip(self), fields(role_id = %id))]
	pub async fn delete(&self, id: &RoleId) -> Result<()> {
		let role = self.get(id).await?;
		if role.is_system {
			tracing::warn!(name = %role.name, "refusing to delete system role");
			return Err(RbacError::forbidden(format!(
				"Role '{}' is a system role and cannot be deleted",
				role.name
			)));
		}
		if !self.roles.delete(id).await? {
			return Err(role_not_found(id));
		}
		tracing::info!("deleted role");
		Ok(())
	}

	/// Users holding the role.
	#[tracing::instrument(skip(self), fields(role_id = %id))]
	pub async fn get_role_users(&self, id: &RoleId) -> Result<Vec<User>> {
		self.get(id).await?;
		let user_ids: Vec<UserId> = self.user_roles.list_user_ids_by_role_id(id).await?;
		if user_ids.is_empty() {
			return Ok(Vec::new());
		}
		Ok(self.users.find_by_ids(&user_ids).await?)
	}

	/// Permissions assigned to the role.
	#[tracing::instrument(skip(self), fields(role_id = %id))]
	pub async fn get_role_permissions(&self, id: &RoleId) -> Result<Vec<PermissionRecord>> {
		self.get(id).await?;
		let permission_ids: Vec<PermissionId> = self
			.role_permissions
			.list_permissions_by_role_id(id)
			.await?
			.into_iter()
			.map(|link| link.permission_id)
			.collect();
		if permission_ids.is_empty() {
			return Ok(Vec::new());
		}
		Ok(self.permissions.find_by_ids(&permission_ids).await?)
	}

	/// Replace the role's permission set with exactly `permission_ids`.
	///
	/// # Errors
	///
	/// [`RbacError::NotFound`] if the role or any of the permissions does not
	/// exist.
	#[tracing::instrument(
		skip(self, permission_ids),
		fields(role_id = %id, permission_count = permission_ids.len())
	)]
	pub async fn set_role_permissions(
		&self,
		id: &RoleId,
		permission_ids: &[PermissionId],
	) -> Result<Vec<PermissionRecord>> {
		self.get(id).await?;
		let permission_ids = unique_ids(permission_ids);

		let found = if permission_ids.is_empty() {
			Vec::new()
		} else {
			self.permissions.find_by_ids(&permission_ids).await?
		};
		if let Some(missing) = permission_ids
			.iter()
			.find(|pid| !found.iter().any(|p| p.id == **pid))
		{
			return Err(RbacError::not_found(format!(
				"Permission {missing} not found"
			)));
		}

		self
			.role_permissions
			.set_role_permissions(id, &permission_ids)
			.await?;
		tracing::info!(permission_count = found.len(), "set role permissions");
		Ok(found)
	}
}

fn role_not_found(id: &RoleId) -> RbacError {
	RbacError::not_found(format!("Role {id} not found"))
}
