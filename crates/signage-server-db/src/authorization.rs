// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use signage_server_rbac::{AuthorizationStore, Permission, StoreError, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;

/// Resolves effective permissions through `user_roles` and `role_permissions`.
#[derive(Clone)]
pub struct AuthorizationRepository {
	pool: SqlitePool,
}

impl AuthorizationRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Distinct permissions granted to the user by any of their roles.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn find_permissions_for_user(
		&self,
		user_id: &UserId,
	) -> Result<Vec<Permission>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT DISTINCT p.resource, p.action
			FROM user_roles ur
			JOIN role_permissions rp ON rp.role_id = ur.role_id
			JOIN permissions p ON p.id = rp.permission_id
			WHERE ur.user_id = ?
			"#,
		)
		.bind(user_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		let permissions: Vec<Permission> = rows
			.iter()
			.map(|row| {
				let resource: String = row.get("resource");
				let action: String = row.get("action");
				Permission::new(resource, action)
			})
			.collect();

		tracing::debug!(count = permissions.len(), "resolved user permissions");
		Ok(permissions)
	}
}

#[async_trait]
impl AuthorizationStore for AuthorizationRepository {
	async fn find_permissions_for_user(
		&self,
		user_id: &UserId,
	) -> Result<Vec<Permission>, StoreError> {
		Ok(self.find_permissions_for_user(user_id).await?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rbac_stores;
	use crate::testing::create_rbac_test_pool;
	use signage_server_rbac::{NewRole, NewUser, RbacServices};

	#[tokio::test]
	async fn test_user_without_roles_has_no_permissions() {
		let repo = AuthorizationRepository::new(create_rbac_test_pool().await.unwrap());
		assert!(repo
			.find_permissions_for_user(&UserId::generate())
			.await
			.unwrap()
			.is_empty());
	}

	#[tokio::test]
	async fn test_check_permission_against_sqlite() {
		let pool = create_rbac_test_pool().await.unwrap();
		let rbac = RbacServices::new(rbac_stores(pool.clone()));

		let user = rbac
			.users
			.create(NewUser {
				email: "ops@example.com".to_string(),
				name: "Ops".to_string(),
				is_active: None,
			})
			.await
			.unwrap();
		let viewer = rbac.roles.create(NewRole::named("Viewer")).await.unwrap();
		let admin = rbac.roles.create(NewRole::named("User Admin")).await.unwrap();
		let read = rbac.permissions.create("content", "read").await.unwrap();
		let manage = rbac.permissions.create("users", "manage").await.unwrap();
		rbac
			.roles
			.set_role_permissions(&viewer.id, &[read.id])
			.await
			.unwrap();
		rbac
			.roles
			.set_role_permissions(&admin.id, &[manage.id, read.id])
			.await
			.unwrap();
		rbac
			.users
			.set_user_roles(&user.id, &[viewer.id, admin.id])
			.await
			.unwrap();

		let repo = AuthorizationRepository::new(pool);
		assert_eq!(repo.find_permissions_for_user(&user.id).await.unwrap().len(), 2);

		assert!(rbac
			.authorizer
			.check_permission(&user.id, "users:delete")
			.await
			.unwrap());
		assert!(!rbac
			.authorizer
			.check_permission(&user.id, "content:delete")
			.await
			.unwrap());
	}

	#[tokio::test]
	async fn test_seeding_is_idempotent_against_sqlite() {
		let pool = create_rbac_test_pool().await.unwrap();
		let rbac = RbacServices::new(rbac_stores(pool));

		assert_eq!(
			rbac.seeder.seed_standard_permissions().await.unwrap().created,
			24
		);
		assert_eq!(
			rbac.seeder.seed_standard_permissions().await.unwrap().created,
			0
		);

		let first = rbac.seeder.seed_super_admin_role().await.unwrap();
		assert!(first.created.role && first.created.permission && first.created.assignment);
		let second = rbac.seeder.seed_super_admin_role().await.unwrap();
		assert!(!second.created.role && !second.created.permission && !second.created.assignment);
		assert_eq!(rbac.permissions.list().await.unwrap().len(), 25);
		assert_eq!(rbac.roles.list().await.unwrap().len(), 1);
	}
}
