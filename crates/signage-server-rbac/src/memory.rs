// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory implementation of every store trait.
//!
//! Entities are kept in insertion order so `list` is deterministic. All state
//! sits behind one [`RwLock`], which makes each `set_*` call atomic.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::permission::{Permission, PermissionRecord, PermissionUpdate};
use crate::role::{NewRole, Role, RoleUpdate};
use crate::service::unique_ids;
use crate::store::{
	AuthorizationStore, PermissionStore, RolePermission, RolePermissionStore, RoleStore, UserRole,
	UserRoleStore, UserStore,
};
use crate::types::{PermissionId, RoleId, UserId};
use crate::user::{NewUser, User, UserUpdate};

#[derive(Debug, Default)]
struct State {
	users: Vec<User>,
	roles: Vec<Role>,
	permissions: Vec<PermissionRecord>,
	user_roles: Vec<UserRole>,
	role_permissions: Vec<RolePermission>,
}

impl State {
	fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
		self
			.users
			.iter()
			.any(|u| u.email == email && Some(u.id) != except)
	}

	fn system_name_taken(&self, name: &str, except: Option<RoleId>) -> bool {
		self
			.roles
			.iter()
			.any(|r| r.is_system && r.name == name && Some(r.id) != except)
	}

	fn pair_taken(&self, resource: &str, action: &str, except: Option<PermissionId>) -> bool {
		self
			.permissions
			.iter()
			.any(|p| p.is_pair(resource, action) && Some(p.id) != except)
	}
}

/// Shared, cloneable in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
	state: Arc<RwLock<State>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl UserStore for MemoryStore {
	async fn list(&self) -> Result<Vec<User>, StoreError> {
		Ok(self.state.read().await.users.clone())
	}

	async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
		let state = self.state.read().await;
		Ok(state.users.iter().find(|u| u.id == *id).cloned())
	}

	async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, StoreError> {
		let state = self.state.read().await;
		Ok(
			state
				.users
				.iter()
				.filter(|u| ids.contains(&u.id))
				.cloned()
				.collect(),
		)
	}

	async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
		let state = self.state.read().await;
		Ok(state.users.iter().find(|u| u.email == email).cloned())
	}

	async fn create(&self, input: &NewUser) -> Result<User, StoreError> {
		let mut state = self.state.write().await;
		if state.email_taken(&input.email, None) {
			return Err(StoreError::Conflict(format!(
				"user email '{}' already exists",
				input.email
			)));
		}
		let user = User::new(&input.email, &input.name, input.is_active.unwrap_or(true));
		state.users.push(user.clone());
		Ok(user)
	}

	async fn update(&self, id: &UserId, update: &UserUpdate) -> Result<Option<User>, StoreError> {
		let mut state = self.state.write().await;
		if let Some(email) = &update.email {
			if state.email_taken(email, Some(*id)) {
				return Err(StoreError::Conflict(format!(
					"user email '{email}' already exists"
				)));
			}
		}
		let Some(user) = state.users.iter_mut().find(|u| u.id == *id) else {
			return Ok(None);
		};
		user.apply(update.clone());
		Ok(Some(user.clone()))
	}

	async fn delete(&self, id: &UserId) -> Result<bool, StoreError> {
		let mut state = self.state.write().await;
		let before = state.users.len();
		state.users.retain(|u| u.id != *id);
		let removed = state.users.len() != before;
		if removed {
			state.user_roles.retain(|ur| ur.user_id != *id);
		}
		Ok(removed)
	}
}

#[async_trait]
impl RoleStore for MemoryStore {
	async fn list(&self) -> Result<Vec<Role>, StoreError> {
		Ok(self.state.read().await.roles.clone())
	}

	async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, StoreError> {
		let state = self.state.read().await;
		Ok(state.roles.iter().find(|r| r.id == *id).cloned())
	}

	async fn find_by_ids(&self, ids: &[RoleId]) -> Result<Vec<Role>, StoreError> {
		let state = self.state.read().await;
		Ok(
			state
				.roles
				.iter()
				.filter(|r| ids.contains(&r.id))
				.cloned()
				.collect(),
		)
	}

	async fn create(&self, input: &NewRole) -> Result<Role, StoreError> {
		let mut state = self.state.write().await;
		let is_system = input.is_system.unwrap_or(false);
		if is_system && state.system_name_taken(&input.name, None) {
			return Err(StoreError::Conflict(format!(
				"system role '{}' already exists",
				input.name
			)));
		}
		let role = Role::new(&input.name, input.description.clone(), is_system);
		state.roles.push(role.clone());
		Ok(role)
	}

	async fn update(&self, id: &RoleId, update: &RoleUpdate) -> Result<Option<Role>, StoreError> {
		let mut state = self.state.write().await;
		let Some(current) = state.roles.iter().find(|r| r.id == *id) else {
			return Ok(None);
		};
		if let Some(name) = &update.name {
			if current.is_system && state.system_name_taken(name, Some(*id)) {
				return Err(StoreError::Conflict(format!(
					"system role '{name}' already exists"
				)));
			}
		}
		let Some(role) = state.roles.iter_mut().find(|r| r.id == *id) else {
			return Ok(None);
		};
		role.apply(update.clone());
		Ok(Some(role.clone()))
	}

	async fn delete(&self, id: &RoleId) -> Result<bool, StoreError> {
		let mut state = self.state.write().await;
		let before = state.roles.len();
		state.roles.retain(|r| r.id != *id);
		let removed = state.roles.len() != before;
		if removed {
			state.user_roles.retain(|ur| ur.role_id != *id);
			state.role_permissions.retain(|rp| rp.role_id != *id);
		}
		Ok(removed)
	}
}

#[async_trait]
impl PermissionStore for MemoryStore {
	async fn list(&self) -> Result<Vec<PermissionRecord>, StoreError> {
		Ok(self.state.read().await.permissions.clone())
	}

	async fn find_by_id(&self, id: &PermissionId) -> Result<Option<PermissionRecord>, StoreError> {
		let state = self.state.read().await;
		Ok(state.permissions.iter().find(|p| p.id == *id).cloned())
	}

	async fn find_by_ids(&self, ids: &[PermissionId]) -> Result<Vec<PermissionRecord>, StoreError> {
		let state = self.state.read().await;
		Ok(
			state
				.permissions
				.iter()
				.filter(|p| ids.contains(&p.id))
				.cloned()
				.collect(),
		)
	}

	async fn create(&self, resource: &str, action: &str) -> Result<PermissionRecord, StoreError> {
		let mut state = self.state.write().await;
		if state.pair_taken(resource, action, None) {
			return Err(StoreError::Conflict(format!(
				"permission '{resource}:{action}' already exists"
			)));
		}
		let record = PermissionRecord::new(resource, action);
		state.permissions.push(record.clone());
		Ok(record)
	}

	async fn update(
		&self,
		id: &PermissionId,
		update: &PermissionUpdate,
	) -> Result<Option<PermissionRecord>, StoreError> {
		let mut state = self.state.write().await;
		let Some(current) = state.permissions.iter().find(|p| p.id == *id) else {
			return Ok(None);
		};
		let resource = update
			.resource
			.clone()
			.unwrap_or_else(|| current.resource.clone());
		let action = update
			.action
			.clone()
			.unwrap_or_else(|| current.action.clone());
		if state.pair_taken(&resource, &action, Some(*id)) {
			return Err(StoreError::Conflict(format!(
				"permission '{resource}:{action}' already exists"
			)));
		}
		let Some(record) = state.permissions.iter_mut().find(|p| p.id == *id) else {
			return Ok(None);
		};
		record.resource = resource;
		record.action = action;
		Ok(Some(record.clone()))
	}

	async fn delete(&self, id: &PermissionId) -> Result<bool, StoreError> {
		let mut state = self.state.write().await;
		let before = state.permissions.len();
		state.permissions.retain(|p| p.id != *id);
		let removed = state.permissions.len() != before;
		if removed {
			state.role_permissions.retain(|rp| rp.permission_id != *id);
		}
		Ok(removed)
	}
}

#[async_trait]
impl UserRoleStore for MemoryStore {
	async fn list_roles_by_user_id(&self, user_id: &UserId) -> Result<Vec<UserRole>, StoreError> {
		let state = self.state.read().await;
		Ok(
			state
				.user_roles
				.iter()
				.filter(|ur| ur.user_id == *user_id)
				.copied()
				.collect(),
		)
	}

	async fn list_user_ids_by_role_id(&self, role_id: &RoleId) -> Result<Vec<UserId>, StoreError> {
		let state = self.state.read().await;
		Ok(
			state
				.user_roles
				.iter()
				.filter(|ur| ur.role_id == *role_id)
				.map(|ur| ur.user_id)
				.collect(),
		)
	}

	async fn set_user_roles(&self, user_id: &UserId, role_ids: &[RoleId]) -> Result<(), StoreError> {
		let mut state = self.state.write().await;
		state.user_roles.retain(|ur| ur.user_id != *user_id);
		for role_id in unique_ids(role_ids) {
			state.user_roles.push(UserRole {
				user_id: *user_id,
				role_id,
			});
		}
		Ok(())
	}
}

#[async_trait]
impl RolePermissionStore for MemoryStore {
	async fn list_permissions_by_role_id(
		&self,
		role_id: &RoleId,
	) -> Result<Vec<RolePermission>, StoreError> {
		let state = self.state.read().await;
		Ok(
			state
				.role_permissions
				.iter()
				.filter(|rp| rp.role_id == *role_id)
				.copied()
				.collect(),
		)
	}

	async fn add_role_permission(
		&self,
		role_id: &RoleId,
		permission_id: &PermissionId,
	) -> Result<bool, StoreError> {
		let mut state = self.state.write().await;
		let link = RolePermission {
			role_id: *role_id,
			permission_id: *permission_id,
		};
		if state.role_permissions.contains(&link) {
			return Ok(false);
		}
		state.role_permissions.push(link);
		Ok(true)
	}

	async fn set_role_permissions(
		&self,
		role_id: &RoleId,
		permission_ids: &[PermissionId],
	) -> Result<(), StoreError> {
		let mut state = self.state.write().await;
		state.role_permissions.retain(|rp| rp.role_id != *role_id);
		for permission_id in unique_ids(permission_ids) {
			state.role_permissions.push(RolePermission {
				role_id: *role_id,
				permission_id,
			});
		}
		Ok(())
	}
}

#[async_trait]
impl AuthorizationStore for MemoryStore {
	async fn find_permissions_for_user(
		&self,
		user_id: &UserId,
	) -> Result<Vec<Permission>, StoreError> {
		let state = self.state.read().await;
		let role_ids: HashSet<RoleId> = state
			.user_roles
			.iter()
			.filter(|ur| ur.user_id == *user_id)
			.map(|ur| ur.role_id)
			.collect();
		let permission_ids: HashSet<PermissionId> = state
			.role_permissions
			.iter()
			.filter(|rp| role_ids.contains(&rp.role_id))
			.map(|rp| rp.permission_id)
			.collect();
		Ok(
			state
				.permissions
				.iter()
				.filter(|p| permission_ids.contains(&p.id))
				.map(PermissionRecord::permission)
				.collect(),
		)
	}
}
