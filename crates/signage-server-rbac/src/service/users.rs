// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use super::{unique_ids, Stores};
use crate::error::{RbacError, Result};
use crate::role::Role;
use crate::store::{RoleStore, UserRoleStore, UserStore};
use crate::types::{RoleId, UserId};
use crate::user::{NewUser, User, UserUpdate};

/// User CRUD and role assignment.
#[derive(Clone)]
pub struct UserService {
	users: Arc<dyn UserStore>,
	roles: Arc<dyn RoleStore>,
	user_roles: Arc<dyn UserRoleStore>,
}

impl UserService {
	pub fn new(stores: &Stores) -> Self {
		Self {
			users: stores.users.clone(),
			roles: stores.roles.clone(),
			user_roles: stores.user_roles.clone(),
		}
	}

	#[tracing::instrument(skip(self))]
	pub async fn list(&self) -> Result<Vec<User>> {
		Ok(self.users.list().await?)
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get(&self, id: &UserId) -> Result<User> {
		self
			.users
			.find_by_id(id)
			.await?
			.ok_or_else(|| user_not_found(id))
	}

	#[tracing::instrument(skip(self, input), fields(email = %input.email))]
	pub async fn create(&self, input: NewUser) -> Result<User> {
		let user = self.users.create(&input).await?;
		tracing::info!(user_id = %user.id, "created user");
		Ok(user)
	}

	#[tracing::instrument(skip(self, update), fields(user_id = %id))]
	pub async fn update(&self, id: &UserId, update: UserUpdate) -> Result<User> {
		let user = self
			.users
			.update(id, &update)
			.await?
			.ok_or_else(|| user_not_found(id))?;
		tracing::info!("updated user");
		Ok(user)
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn delete(&self, id: &UserId) -> Result<()> {
		if !self.users.delete(id).await? {
			return Err(user_not_found(id));
		}
		tracing::info!("deleted user");
		Ok(())
	}

	/// Roles currently assigned to the user.
	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user_roles(&self, id: &UserId) -> Result<Vec<Role>> {
		self.get(id).await?;
		let role_ids: Vec<RoleId> = self
			.user_roles
			.list_roles_by_user_id(id)
			.await?
			.into_iter()
			.map(|link| link.role_id)
			.collect();
		if role_ids.is_empty() {
			return Ok(Vec::new());
		}
		Ok(self.roles.find_by_ids(&role_ids).await?)
	}

	/// Replace the user's role set with exactly `role_ids`.
	///
	/// Returns the assigned roles in role catalog order.
	///
	/// # Errors
	///
	/// [`RbacError::NotFound`] if the user or any of the roles does not exist.
	#[tracing::instrument(skip(self, role_ids), fields(user_id = %id, role_count = role_ids.len()))]
	pub async fn set_user_roles(&self, id: &UserId, role_ids: &[RoleId]) -> Result<Vec<Role>> {
		self.get(id).await?;
		let role_ids = unique_ids(role_ids);

		let catalog = self.roles.list().await?;
		let assigned: Vec<Role> = catalog
			.into_iter()
			.filter(|role| role_ids.contains(&role.id))
			.collect();
		if let Some(missing) = role_ids
			.iter()
			.find(|role_id| !assigned.iter().any(|role| role.id == **role_id))
		{
			return Err(RbacError::not_found(format!("Role {missing} not found")));
		}

		self.user_roles.set_user_roles(id, &role_ids).await?;
		tracing::info!(role_count = assigned.len(), "set user roles");
		Ok(assigned)
	}
}

fn user_not_found(id: &UserId) -> RbacError {
	RbacError::not_found(format!("User {id} not found"))
}
