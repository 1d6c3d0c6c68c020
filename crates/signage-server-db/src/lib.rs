// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence for the signage RBAC stores.
//!
//! Each repository wraps a [`SqlitePool`] and implements one store trait from
//! `signage-server-rbac`. [`rbac_stores`] bundles them for
//! [`signage_server_rbac::RbacServices`].

pub mod assignment;
pub mod authorization;
pub mod error;
pub mod permission;
pub mod pool;
pub mod role;
mod row;
pub mod testing;
pub mod user;

use std::sync::Arc;

use signage_server_rbac::Stores;
use sqlx::sqlite::SqlitePool;

pub use assignment::{RolePermissionRepository, UserRoleRepository};
pub use authorization::AuthorizationRepository;
pub use error::{DbError, Result};
pub use permission::PermissionRepository;
pub use pool::create_pool;
pub use role::RoleRepository;
pub use user::UserRepository;

const RBAC_SCHEMA: &str = include_str!("../migrations/001_rbac.sql");

/// Apply the RBAC schema. Safe to run repeatedly.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
	sqlx::raw_sql(RBAC_SCHEMA).execute(pool).await?;
	tracing::info!("database migrations applied");
	Ok(())
}

/// Store handles backed by `pool`.
pub fn rbac_stores(pool: SqlitePool) -> Stores {
	Stores {
		users: Arc::new(UserRepository::new(pool.clone())),
		roles: Arc::new(RoleRepository::new(pool.clone())),
		permissions: Arc::new(PermissionRepository::new(pool.clone())),
		user_roles: Arc::new(UserRoleRepository::new(pool.clone())),
		role_permissions: Arc::new(RolePermissionRepository::new(pool.clone())),
		authorization: Arc::new(AuthorizationRepository::new(pool)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn migrations_are_idempotent() {
		let pool = testing::create_test_pool().await.unwrap();
		run_migrations(&pool).await.unwrap();
		run_migrations(&pool).await.unwrap();

		let tables: Vec<String> = sqlx::query_scalar(
			"SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
		)
		.fetch_all(&pool)
		.await
		.unwrap();
		assert_eq!(
			tables,
			vec!["permissions", "role_permissions", "roles", "user_roles", "users"]
		);
	}
}
