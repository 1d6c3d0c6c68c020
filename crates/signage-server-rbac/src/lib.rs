// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role-based access control for the signage server.
//!
//! This crate owns the permission model and every RBAC use case:
//!
//! - [`Permission`] values and the wildcard/`manage` matching rules
//! - store traits ([`store`]) implemented by persistence crates, plus an
//!   in-memory [`MemoryStore`]
//! - services for user, role and permission CRUD, assignment management,
//!   the [`Authorizer`] permission check, and idempotent [`Seeder`] bootstrap
//!
//! # Example
//!
//! ```
//! use signage_server_rbac::{MemoryStore, RbacServices, Stores};
//!
//! # tokio_test::block_on(async {
//! let rbac = RbacServices::new(Stores::from_shared(MemoryStore::new()));
//! let report = rbac.seeder.seed_standard_permissions().await.unwrap();
//! assert_eq!(report.created, 24);
//! # });
//! ```

pub mod error;
pub mod memory;
pub mod permission;
pub mod role;
pub mod service;
pub mod store;
pub mod types;
pub mod user;

pub use error::{RbacError, Result, StoreError};
pub use memory::MemoryStore;
pub use permission::{
	Permission, PermissionError, PermissionRecord, PermissionUpdate, MANAGE_ACTION,
	WILDCARD_RESOURCE,
};
pub use role::{NewRole, Role, RoleUpdate};
pub use service::{
	Authorizer, PermissionService, RbacServices, RoleService, SeedPermissionsReport,
	SeedSuperAdminReport, Seeder, Stores, SuperAdminCreated, UserService, SUPER_ADMIN_ROLE_NAME,
};
pub use store::{
	AuthorizationStore, PermissionStore, RolePermission, RolePermissionStore, RoleStore, UserRole,
	UserRoleStore, UserStore,
};
pub use types::{PermissionId, RoleId, UserId};
pub use user::{NewUser, User, UserUpdate};
