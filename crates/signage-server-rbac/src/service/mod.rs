// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! RBAC use cases.
//!
//! Each service is cheap to clone and holds only `Arc`s to the stores it
//! needs. [`Stores`] bundles the six store handles so composition roots can
//! build every service from one value.

mod authorizer;
mod permissions;
mod roles;
mod seed;
mod users;

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

pub use authorizer::Authorizer;
pub use permissions::PermissionService;
pub use roles::RoleService;
pub use seed::{
	SeedPermissionsReport, SeedSuperAdminReport, Seeder, SuperAdminCreated, STANDARD_ACTIONS,
	STANDARD_RESOURCES, SUPER_ADMIN_DESCRIPTION, SUPER_ADMIN_ROLE_NAME,
};
pub use users::UserService;

use crate::store::{
	AuthorizationStore, PermissionStore, RolePermissionStore, RoleStore, UserRoleStore, UserStore,
};

/// Handles to every store the services consume.
#[derive(Clone)]
pub struct Stores {
	pub users: Arc<dyn UserStore>,
	pub roles: Arc<dyn RoleStore>,
	pub permissions: Arc<dyn PermissionStore>,
	pub user_roles: Arc<dyn UserRoleStore>,
	pub role_permissions: Arc<dyn RolePermissionStore>,
	pub authorization: Arc<dyn AuthorizationStore>,
}

impl Stores {
	/// Use a single value implementing every store trait for all six handles.
	pub fn from_shared<S>(store: S) -> Self
	where
		S: UserStore
			+ RoleStore
			+ PermissionStore
			+ UserRoleStore
			+ RolePermissionStore
			+ AuthorizationStore
			+ 'static,
	{
		let store = Arc::new(store);
		Self {
			users: store.clone(),
			roles: store.clone(),
			permissions: store.clone(),
			user_roles: store.clone(),
			role_permissions: store.clone(),
			authorization: store,
		}
	}
}

/// All RBAC services built over one set of stores.
#[derive(Clone)]
pub struct RbacServices {
	pub users: UserService,
	pub roles: RoleService,
	pub permissions: PermissionService,
	pub authorizer: Authorizer,
	pub seeder: Seeder,
}

impl RbacServices {
	pub fn new(stores: Stores) -> Self {
		Self {
			users: UserService::new(&stores),
			roles: RoleService::new(&stores),
			permissions: PermissionService::new(&stores),
			authorizer: Authorizer::new(&stores),
			seeder: Seeder::new(&stores),
		}
	}
}

/// Drop repeated ids, keeping first occurrences in order.
pub(crate) fn unique_ids<T: Copy + Eq + Hash>(ids: &[T]) -> Vec<T> {
	let mut seen = HashSet::with_capacity(ids.len());
	ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
