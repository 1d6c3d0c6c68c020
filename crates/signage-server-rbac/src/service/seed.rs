// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Idempotent bootstrap of the permission catalog and the super admin role.
//!
//! Every step looks up the natural key, creates on absence, and treats a
//! store conflict from `create` as a concurrent insert: the row is re-fetched
//! and counted as already present. Existing rows are never modified.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use super::Stores;
use crate::error::{RbacError, Result, StoreError};
use crate::permission::{PermissionRecord, MANAGE_ACTION, WILDCARD_RESOURCE};
use crate::role::{NewRole, Role};
use crate::store::{PermissionStore, RolePermissionStore, RoleStore, UserRoleStore, UserStore};
use crate::user::User;

/// Resources covered by the standard catalog, in seeding order.
pub const STANDARD_RESOURCES: [&str; 6] =
	["content", "playlists", "schedules", "devices", "users", "roles"];

/// Actions granted per standard resource, in seeding order.
pub const STANDARD_ACTIONS: [&str; 4] = ["read", "create", "update", "delete"];

pub const SUPER_ADMIN_ROLE_NAME: &str = "Super Admin";
pub const SUPER_ADMIN_DESCRIPTION: &str = "All access";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedPermissionsReport {
	/// Permissions inserted by this run.
	pub created: usize,
}

/// Which super admin steps changed state during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SuperAdminCreated {
	pub role: bool,
	pub permission: bool,
	pub assignment: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedSuperAdminReport {
	pub role: Role,
	pub permission: PermissionRecord,
	pub created: SuperAdminCreated,
}

#[derive(Clone)]
pub struct Seeder {
	users: Arc<dyn UserStore>,
	roles: Arc<dyn RoleStore>,
	permissions: Arc<dyn PermissionStore>,
	user_roles: Arc<dyn UserRoleStore>,
	role_permissions: Arc<dyn RolePermissionStore>,
}

impl Seeder {
	pub fn new(stores: &Stores) -> Self {
		Self {
			users: stores.users.clone(),
			roles: stores.roles.clone(),
			permissions: stores.permissions.clone(),
			user_roles: stores.user_roles.clone(),
			role_permissions: stores.role_permissions.clone(),
		}
	}

	/// The standard `(resource, action)` catalog, resource-major.
	pub fn standard_catalog() -> impl Iterator<Item = (&'static str, &'static str)> {
		STANDARD_RESOURCES
			.into_iter()
			.flat_map(|resource| STANDARD_ACTIONS.into_iter().map(move |action| (resource, action)))
	}

	/// Insert every standard permission that is not stored yet.
	#[tracing::instrument(skip(self))]
	pub async fn seed_standard_permissions(&self) -> Result<SeedPermissionsReport> {
		let existing: HashSet<String> = self
			.permissions
			.list()
			.await?
			.iter()
			.map(|record| record.permission().key())
			.collect();

		let mut created = 0;
		for (resource, action) in Self::standard_catalog() {
			if existing.contains(&format!("{resource}:{action}")) {
				continue;
			}
			match self.permissions.create(resource, action).await {
				Ok(_) => created += 1,
				Err(StoreError::Conflict(_)) => {
					tracing::warn!(resource, action, "permission inserted concurrently, skipping");
				}
				Err(e) => return Err(e.into()),
			}
		}

		tracing::info!(created, "seeded standard permissions");
		Ok(SeedPermissionsReport { created })
	}

	/// Ensure the `Super Admin` system role exists and holds `*:manage`.
	#[tracing::instrument(skip(self))]
	pub async fn seed_super_admin_role(&self) -> Result<SeedSuperAdminReport> {
		let (role, role_created) = self.ensure_super_admin_role().await?;
		let (permission, permission_created) = self.ensure_super_admin_permission().await?;

		let assignment_created = self
			.role_permissions
			.add_role_permission(&role.id, &permission.id)
			.await?;

		let created = SuperAdminCreated {
			role: role_created,
			permission: permission_created,
			assignment: assignment_created,
		};
		tracing::info!(
			role_id = %role.id,
			permission_id = %permission.id,
			role_created,
			permission_created,
			assignment_created,
			"seeded super admin role"
		);
		Ok(SeedSuperAdminReport {
			role,
			permission,
			created,
		})
	}

	/// Make the user with `email` hold exactly the `Super Admin` role.
	///
	/// # Errors
	///
	/// [`RbacError::NotFound`] if no user has that email, or if the role has
	/// not been seeded.
	#[tracing::instrument(skip(self))]
	pub async fn assign_super_admin(&self, email: &str) -> Result<User> {
		let user = self
			.users
			.find_by_email(email)
			.await?
			.ok_or_else(|| RbacError::not_found(format!("User with email '{email}' not found")))?;
		let role = self.find_super_admin_role().await?.ok_or_else(|| {
			RbacError::not_found(format!(
				"Role '{SUPER_ADMIN_ROLE_NAME}' not found; run seed-super-admin first"
			))
		})?;

		self.user_roles.set_user_roles(&user.id, &[role.id]).await?;
		tracing::info!(user_id = %user.id, role_id = %role.id, "assigned super admin");
		Ok(user)
	}

	async fn find_super_admin_role(&self) -> Result<Option<Role>> {
		Ok(
			self
				.roles
				.list()
				.await?
				.into_iter()
				.find(|role| role.is_system && role.name == SUPER_ADMIN_ROLE_NAME),
		)
	}

	async fn ensure_super_admin_role(&self) -> Result<(Role, bool)> {
		if let Some(role) = self.find_super_admin_role().await? {
			return Ok((role, false));
		}

		let input = NewRole {
			name: SUPER_ADMIN_ROLE_NAME.to_string(),
			description: Some(SUPER_ADMIN_DESCRIPTION.to_string()),
			is_system: Some(true),
		};
		match self.roles.create(&input).await {
			Ok(role) => Ok((role, true)),
			Err(StoreError::Conflict(msg)) => {
				tracing::warn!("super admin role inserted concurrently, re-fetching");
				let role = self
					.find_super_admin_role()
					.await?
					.ok_or(StoreError::Conflict(msg))?;
				Ok((role, false))
			}
			Err(e) => Err(e.into()),
		}
	}

	async fn find_super_admin_permission(&self) -> Result<Option<PermissionRecord>> {
		Ok(
			self
				.permissions
				.list()
				.await?
				.into_iter()
				.find(|record| record.is_pair(WILDCARD_RESOURCE, MANAGE_ACTION)),
		)
	}

	async fn ensure_super_admin_permission(&self) -> Result<(PermissionRecord, bool)> {
		if let Some(record) = self.find_super_admin_permission().await? {
			return Ok((record, false));
		}

		match self
			.permissions
			.create(WILDCARD_RESOURCE, MANAGE_ACTION)
			.await
		{
			Ok(record) => Ok((record, true)),
			Err(StoreError::Conflict(msg)) => {
				tracing::warn!("super admin permission inserted concurrently, re-fetching");
				let record = self
					.find_super_admin_permission()
					.await?
					.ok_or(StoreError::Conflict(msg))?;
				Ok((record, false))
			}
			Err(e) => Err(e.into()),
		}
	}
}
