// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Store traits consumed by the RBAC services.
//!
//! Any datastore can back the services by implementing these traits. The
//! relation tables (`user_roles`, `role_permissions`) are addressed purely by
//! ids; joins are computed by id-set intersection.
//!
//! Implementations must:
//! - enforce uniqueness of `(resource, action)` on permissions, of user
//!   email, and of system role names, reporting violations as
//!   [`StoreError::Conflict`]
//! - replace assignment sets atomically in `set_*` operations
//! - drop assignments that reference a deleted user, role or permission

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::permission::{Permission, PermissionRecord, PermissionUpdate};
use crate::role::{NewRole, Role, RoleUpdate};
use crate::types::{PermissionId, RoleId, UserId};
use crate::user::{NewUser, User, UserUpdate};

/// Link between a user and a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRole {
	pub user_id: UserId,
	pub role_id: RoleId,
}

/// Link between a role and a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RolePermission {
	pub role_id: RoleId,
	pub permission_id: PermissionId,
}

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn list(&self) -> Result<Vec<User>, StoreError>;
	async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError>;
	async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, StoreError>;
	async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
	async fn create(&self, input: &NewUser) -> Result<User, StoreError>;
	async fn update(&self, id: &UserId, update: &UserUpdate) -> Result<Option<User>, StoreError>;
	async fn delete(&self, id: &UserId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
	async fn list(&self) -> Result<Vec<Role>, StoreError>;
	async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, StoreError>;
	async fn find_by_ids(&self, ids: &[RoleId]) -> Result<Vec<Role>, StoreError>;
	async fn create(&self, input: &NewRole) -> Result<Role, StoreError>;
	async fn update(&self, id: &RoleId, update: &RoleUpdate) -> Result<Option<Role>, StoreError>;
	async fn delete(&self, id: &RoleId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait PermissionStore: Send + Sync {
	async fn list(&self) -> Result<Vec<PermissionRecord>, StoreError>;
	async fn find_by_id(&self, id: &PermissionId) -> Result<Option<PermissionRecord>, StoreError>;
	async fn find_by_ids(&self, ids: &[PermissionId]) -> Result<Vec<PermissionRecord>, StoreError>;
	async fn create(&self, resource: &str, action: &str) -> Result<PermissionRecord, StoreError>;
	async fn update(
		&self,
		id: &PermissionId,
		update: &PermissionUpdate,
	) -> Result<Option<PermissionRecord>, StoreError>;
	async fn delete(&self, id: &PermissionId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait UserRoleStore: Send + Sync {
	async fn list_roles_by_user_id(&self, user_id: &UserId) -> Result<Vec<UserRole>, StoreError>;
	async fn list_user_ids_by_role_id(&self, role_id: &RoleId) -> Result<Vec<UserId>, StoreError>;
	/// Replace the user's role set with exactly `role_ids`.
	async fn set_user_roles(&self, user_id: &UserId, role_ids: &[RoleId]) -> Result<(), StoreError>;
}

#[async_trait]
pub trait RolePermissionStore: Send + Sync {
	async fn list_permissions_by_role_id(
		&self,
		role_id: &RoleId,
	) -> Result<Vec<RolePermission>, StoreError>;
	/// Link a single permission to the role, keeping its other links.
	///
	/// Returns `false` if the link already existed.
	async fn add_role_permission(
		&self,
		role_id: &RoleId,
		permission_id: &PermissionId,
	) -> Result<bool, StoreError>;
	/// Replace the role's permission set with exactly `permission_ids`.
	async fn set_role_permissions(
		&self,
		role_id: &RoleId,
		permission_ids: &[PermissionId],
	) -> Result<(), StoreError>;
}

/// Resolves a user's effective permissions across the assignment tables.
#[async_trait]
pub trait AuthorizationStore: Send + Sync {
	async fn find_permissions_for_user(&self, user_id: &UserId)
		-> Result<Vec<Permission>, StoreError>;
}
