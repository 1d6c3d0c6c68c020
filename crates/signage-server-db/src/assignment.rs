// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Repositories for the `user_roles` and `role_permissions` link tables.
//!
//! `set_*` operations delete the anchor's links and insert the new set in a
//! single transaction, so readers never observe an empty intermediate state.

use async_trait::async_trait;
use signage_server_rbac::{
	PermissionId, RoleId, RolePermission, RolePermissionStore, StoreError, UserId, UserRole,
	UserRoleStore,
};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::parse_uuid;

#[derive(Clone)]
pub struct UserRoleRepository {
	pool: SqlitePool,
}

impl UserRoleRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn list_roles_by_user_id(&self, user_id: &UserId) -> Result<Vec<UserRole>, DbError> {
		let rows = sqlx::query("SELECT user_id, role_id FROM user_roles WHERE user_id = ? ORDER BY rowid")
			.bind(user_id.to_string())
			.fetch_all(&self.pool)
			.await?;

		rows.iter().map(parse_user_role_row).collect()
	}

	#[tracing::instrument(skip(self), fields(role_id = %role_id))]
	pub async fn list_user_ids_by_role_id(&self, role_id: &RoleId) -> Result<Vec<UserId>, DbError> {
		let rows = sqlx::query("SELECT user_id FROM user_roles WHERE role_id = ? ORDER BY rowid")
			.bind(role_id.to_string())
			.fetch_all(&self.pool)
			.await?;

		rows
			.iter()
			.map(|row| {
				let user_id: String = row.get("user_id");
				parse_uuid(&user_id, "user").map(UserId::new)
			})
			.collect()
	}

	/// Replace the user's roles with exactly `role_ids`.
	///
	/// # Database Constraints
	/// - `user_id` and every role id must reference existing rows
	#[tracing::instrument(skip(self, role_ids), fields(user_id = %user_id, count = role_ids.len()))]
	pub async fn set_user_roles(&self, user_id: &UserId, role_ids: &[RoleId]) -> Result<(), DbError> {
		let mut tx = self.pool.begin().await?;

		sqlx::query("DELETE FROM user_roles WHERE user_id = ?")
			.bind(user_id.to_string())
			.execute(&mut *tx)
			.await?;

		for role_id in role_ids {
			sqlx::query("INSERT OR IGNORE INTO user_roles (user_id, role_id) VALUES (?, ?)")
				.bind(user_id.to_string())
				.bind(role_id.to_string())
				.execute(&mut *tx)
				.await?;
		}

		tx.commit().await?;
		tracing::debug!("user roles replaced");
		Ok(())
	}
}

fn parse_user_role_row(row: &sqlx::sqlite::SqliteRow) -> Result<UserRole, DbError> {
	let user_id: String = row.get("user_id");
	let role_id: String = row.get("role_id");

	Ok(UserRole {
		user_id: UserId::new(parse_uuid(&user_id, "user")?),
		role_id: RoleId::new(parse_uuid(&role_id, "role")?),
	})
}

#[async_trait]
impl UserRoleStore for UserRoleRepository {
	async fn list_roles_by_user_id(&self, user_id: &UserId) -> Result<Vec<UserRole>, StoreError> {
		Ok(self.list_roles_by_user_id(user_id).await?)
	}

	async fn list_user_ids_by_role_id(&self, role_id: &RoleId) -> Result<Vec<UserId>, StoreError> {
		Ok(self.list_user_ids_by_role_id(role_id).await?)
	}

	async fn set_user_roles(&self, user_id: &UserId, role_ids: &[RoleId]) -> Result<(), StoreError> {
		Ok(self.set_user_roles(user_id, role_ids).await?)
	}
}

#[derive(Clone)]
pub struct RolePermissionRepository {
	pool: SqlitePool,
}

impl RolePermissionRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self), fields(role_id = %role_id))]
	pub async fn list_permissions_by_role_id(
		&self,
		role_id: &RoleId,
	) -> Result<Vec<RolePermission>, DbError> {
		let rows = sqlx::query(
			"SELECT role_id, permission_id FROM role_permissions WHERE role_id = ? ORDER BY rowid",
		)
		.bind(role_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_role_permission_row).collect()
	}

	/// Insert one role-permission link, ignoring an existing one.
	///
	/// Returns whether a row was inserted.
	#[tracing::instrument(skip(self), fields(role_id = %role_id, permission_id = %permission_id))]
	pub async fn add_role_permission(
		&self,
		role_id: &RoleId,
		permission_id: &PermissionId,
	) -> Result<bool, DbError> {
		let result =
			sqlx::query("INSERT OR IGNORE INTO role_permissions (role_id, permission_id) VALUES (?, ?)")
				.bind(role_id.to_string())
				.bind(permission_id.to_string())
				.execute(&self.pool)
				.await?;

		Ok(result.rows_affected() > 0)
	}

	/// Replace the role's permissions with exactly `permission_ids`.
	#[tracing::instrument(
		skip(self, permission_ids),
		fields(role_id = %role_id, count = permission_ids.len())
	)]
	pub async fn set_role_permissions(
		&self,
		role_id: &RoleId,
		permission_ids: &[PermissionId],
	) -> Result<(), DbError> {
		let mut tx = self.pool.begin().await?;

		sqlx::query("DELETE FROM role_permissions WHERE role_id = ?")
			.bind(role_id.to_string())
			.execute(&mut *tx)
			.await?;

		for permission_id in permission_ids {
			sqlx::query(
				"INSERT OR IGNORE INTO role_permissions (role_id, permission_id) VALUES (?, ?)",
			)
			.bind(role_id.to_string())
			.bind(permission_id.to_string())
			.execute(&mut *tx)
			.await?;
		}

		tx.commit().await?;
		tracing::debug!("role permissions replaced");
		Ok(())
	}
}

fn parse_role_permission_row(row: &sqlx::sqlite::SqliteRow) -> Result<RolePermission, DbError> {
	let role_id: String = row.get("role_id");
	let permission_id: String = row.get("permission_id");

	Ok(RolePermission {
		role_id: RoleId::new(parse_uuid(&role_id, "role")?),
		permission_id: PermissionId::new(parse_uuid(&permission_id, "permission")?),
	})
}

#[async_trait]
impl RolePermissionStore for RolePermissionRepository {
	async fn list_permissions_by_role_id(
		&self,
		role_id: &RoleId,
	) -> Result<Vec<RolePermission>, StoreError> {
		Ok(self.list_permissions_by_role_id(role_id).await?)
	}

	async fn add_role_permission(
		&self,
		role_id: &RoleId,
		permission_id: &PermissionId,
	) -> Result<bool, StoreError> {
		Ok(self.add_role_permission(role_id, permission_id).await?)
	}

	async fn set_role_permissions(
		&self,
		role_id: &RoleId,
		permission_ids: &[PermissionId],
	) -> Result<(), StoreError> {
		Ok(self.set_role_permissions(role_id, permission_ids).await?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_rbac_test_pool;
	use crate::{PermissionRepository, RoleRepository, UserRepository};
	use signage_server_rbac::{NewRole, NewUser, PermissionRecord, Role, User};

	struct Fixture {
		users: UserRepository,
		roles: RoleRepository,
		permissions: PermissionRepository,
		user_roles: UserRoleRepository,
		role_permissions: RolePermissionRepository,
	}

	async fn fixture() -> Fixture {
		let pool = create_rbac_test_pool().await.unwrap();
		Fixture {
			users: UserRepository::new(pool.clone()),
			roles: RoleRepository::new(pool.clone()),
			permissions: PermissionRepository::new(pool.clone()),
			user_roles: UserRoleRepository::new(pool.clone()),
			role_permissions: RolePermissionRepository::new(pool),
		}
	}

	impl Fixture {
		async fn user(&self, email: &str) -> User {
			self
				.users
				.create(&NewUser {
					email: email.to_string(),
					name: "Test".to_string(),
					is_active: None,
				})
				.await
				.unwrap()
		}

		async fn role(&self, name: &str) -> Role {
			self.roles.create(&NewRole::named(name)).await.unwrap()
		}

		async fn permission(&self, resource: &str, action: &str) -> PermissionRecord {
			self.permissions.create(resource, action).await.unwrap()
		}
	}

	#[tokio::test]
	async fn test_set_user_roles_replaces_set() {
		let f = fixture().await;
		let user = f.user("a@example.com").await;
		let a = f.role("A").await;
		let b = f.role("B").await;

		f.user_roles.set_user_roles(&user.id, &[a.id, b.id]).await.unwrap();
		assert_eq!(f.user_roles.list_roles_by_user_id(&user.id).await.unwrap().len(), 2);

		f.user_roles.set_user_roles(&user.id, &[b.id, b.id]).await.unwrap();
		assert_eq!(
			f.user_roles.list_roles_by_user_id(&user.id).await.unwrap(),
			vec![UserRole {
				user_id: user.id,
				role_id: b.id
			}]
		);
		assert_eq!(
			f.user_roles.list_user_ids_by_role_id(&b.id).await.unwrap(),
			vec![user.id]
		);

		f.user_roles.set_user_roles(&user.id, &[]).await.unwrap();
		assert!(f.user_roles.list_roles_by_user_id(&user.id).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_failed_set_keeps_previous_roles() {
		let f = fixture().await;
		let user = f.user("a@example.com").await;
		let a = f.role("A").await;
		f.user_roles.set_user_roles(&user.id, &[a.id]).await.unwrap();

		let result = f
			.user_roles
			.set_user_roles(&user.id, &[RoleId::generate()])
			.await;
		assert!(result.is_err());
		assert_eq!(f.user_roles.list_roles_by_user_id(&user.id).await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_deleting_user_cascades() {
		let f = fixture().await;
		let user = f.user("a@example.com").await;
		let a = f.role("A").await;
		f.user_roles.set_user_roles(&user.id, &[a.id]).await.unwrap();

		f.users.delete(&user.id).await.unwrap();
		assert!(f.user_roles.list_user_ids_by_role_id(&a.id).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_role_permissions_replace_and_cascade() {
		let f = fixture().await;
		let role = f.role("Editor").await;
		let read = f.permission("content", "read").await;
		let update = f.permission("content", "update").await;

		f.role_permissions
			.set_role_permissions(&role.id, &[read.id, update.id])
			.await
			.unwrap();
		assert_eq!(
			f.role_permissions
				.list_permissions_by_role_id(&role.id)
				.await
				.unwrap()
				.len(),
			2
		);

		f.permissions.delete(&read.id).await.unwrap();
		assert_eq!(
			f.role_permissions
				.list_permissions_by_role_id(&role.id)
				.await
				.unwrap(),
			vec![RolePermission {
				role_id: role.id,
				permission_id: update.id
			}]
		);

		f.roles.delete(&role.id).await.unwrap();
		assert!(f
			.role_permissions
			.list_permissions_by_role_id(&role.id)
			.await
			.unwrap()
			.is_empty());
	}

	#[tokio::test]
	async fn test_add_role_permission_keeps_other_links() {
		let f = fixture().await;
		let role = f.role("Editor").await;
		let read = f.permission("content", "read").await;
		let manage = f.permission("*", "manage").await;
		f.role_permissions
			.set_role_permissions(&role.id, &[read.id])
			.await
			.unwrap();

		assert!(f
			.role_permissions
			.add_role_permission(&role.id, &manage.id)
			.await
			.unwrap());
		assert!(!f
			.role_permissions
			.add_role_permission(&role.id, &manage.id)
			.await
			.unwrap());

		let ids: Vec<PermissionId> = f
			.role_permissions
			.list_permissions_by_role_id(&role.id)
			.await
			.unwrap()
			.into_iter()
			.map(|link| link.permission_id)
			.collect();
		assert_eq!(ids, vec![read.id, manage.id]);

		let result = f
			.role_permissions
			.add_role_permission(&role.id, &PermissionId::generate())
			.await;
		assert!(result.is_err());
	}
}
