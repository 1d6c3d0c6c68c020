// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role repository for database operations.

use async_trait::async_trait;
use chrono::Utc;
use signage_server_rbac::{NewRole, Role, RoleId, RoleStore, RoleUpdate, StoreError};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{parse_uuid, placeholders};

const ROLE_COLUMNS: &str = "id, name, description, is_system";

/// Repository for role rows.
///
/// Names of system roles are unique through a partial index; custom roles
/// may share a name.
#[derive(Clone)]
pub struct RoleRepository {
	pool: SqlitePool,
}

impl RoleRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self))]
	pub async fn list(&self) -> Result<Vec<Role>, DbError> {
		let rows = sqlx::query(&format!(
			"SELECT {ROLE_COLUMNS} FROM roles ORDER BY created_at, rowid"
		))
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_role_row).collect()
	}

	#[tracing::instrument(skip(self), fields(role_id = %id))]
	pub async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, DbError> {
		let row = sqlx::query(&format!("SELECT {ROLE_COLUMNS} FROM roles WHERE id = ?"))
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(parse_role_row).transpose()
	}

	#[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
	pub async fn find_by_ids(&self, ids: &[RoleId]) -> Result<Vec<Role>, DbError> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}
		let sql = format!(
			"SELECT {ROLE_COLUMNS} FROM roles WHERE id IN ({}) ORDER BY created_at, rowid",
			placeholders(ids.len())
		);
		let mut query = sqlx::query(&sql);
		for id in ids {
			query = query.bind(id.to_string());
		}
		let rows = query.fetch_all(&self.pool).await?;

		rows.iter().map(parse_role_row).collect()
	}

	#[tracing::instrument(skip(self, input), fields(name = %input.name))]
	pub async fn create(&self, input: &NewRole) -> Result<Role, DbError> {
		let role = Role::new(
			&input.name,
			input.description.clone(),
			input.is_system.unwrap_or(false),
		);

		sqlx::query(
			r#"
			INSERT INTO roles (id, name, description, is_system, created_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(role.id.to_string())
		.bind(&role.name)
		.bind(&role.description)
		.bind(role.is_system)
		.bind(Utc::now().to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(role_id = %role.id, "role created");
		Ok(role)
	}

	#[tracing::instrument(skip(self, update), fields(role_id = %id))]
	pub async fn update(&self, id: &RoleId, update: &RoleUpdate) -> Result<Option<Role>, DbError> {
		let mut tx = self.pool.begin().await?;

		let row = sqlx::query(&format!("SELECT {ROLE_COLUMNS} FROM roles WHERE id = ?"))
			.bind(id.to_string())
			.fetch_optional(&mut *tx)
			.await?;
		let Some(row) = row else {
			return Ok(None);
		};
		let mut role = parse_role_row(&row)?;
		role.apply(update.clone());

		sqlx::query("UPDATE roles SET name = ?, description = ? WHERE id = ?")
			.bind(&role.name)
			.bind(&role.description)
			.bind(id.to_string())
			.execute(&mut *tx)
			.await?;

		tx.commit().await?;
		tracing::debug!("role updated");
		Ok(Some(role))
	}

	/// Delete a role and, by cascade, its user and permission assignments.
	///
	/// The system-role guard lives in the service layer.
	#[tracing::instrument(skip(self), fields(role_id = %id))]
	pub async fn delete(&self, id: &RoleId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM roles WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}

fn parse_role_row(row: &sqlx::sqlite::SqliteRow) -> Result<Role, DbError> {
	let id: String = row.get("id");
	let is_system: i64 = row.get("is_system");

	Ok(Role {
		id: RoleId::new(parse_uuid(&id, "role")?),
		name: row.get("name"),
		description: row.get("description"),
		is_system: is_system != 0,
	})
}

#[async_trait]
impl RoleStore for RoleRepository {
	async fn list(&self) -> Result<Vec<Role>, StoreError> {
		Ok(self.list().await?)
	}

	async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, StoreError> {
		Ok(self.find_by_id(id).await?)
	}

	async fn find_by_ids(&self, ids: &[RoleId]) -> Result<Vec<Role>, StoreError> {
		Ok(self.find_by_ids(ids).await?)
	}

	async fn create(&self, input: &NewRole) -> Result<Role, StoreError> {
		Ok(self.create(input).await?)
	}

	async fn update(&self, id: &RoleId, update: &RoleUpdate) -> Result<Option<Role>, StoreError> {
		Ok(self.update(id, update).await?)
	}

	async fn delete(&self, id: &RoleId) -> Result<bool, StoreError> {
		Ok(self.delete(id).await?)
	}
}
