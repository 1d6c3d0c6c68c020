// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission repository for database operations.

use async_trait::async_trait;
use chrono::Utc;
use signage_server_rbac::{
	PermissionId, PermissionRecord, PermissionStore, PermissionUpdate, StoreError,
};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{parse_uuid, placeholders};

/// Repository for permission rows. `(resource, action)` is unique.
#[derive(Clone)]
pub struct PermissionRepository {
	pool: SqlitePool,
}

impl PermissionRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self))]
	pub async fn list(&self) -> Result<Vec<PermissionRecord>, DbError> {
		let rows = sqlx::query(
			"SELECT id, resource, action FROM permissions ORDER BY created_at, rowid",
		)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_permission_row).collect()
	}

	#[tracing::instrument(skip(self), fields(permission_id = %id))]
	pub async fn find_by_id(&self, id: &PermissionId) -> Result<Option<PermissionRecord>, DbError> {
		let row = sqlx::query("SELECT id, resource, action FROM permissions WHERE id = ?")
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(parse_permission_row).transpose()
	}

	#[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
	pub async fn find_by_ids(&self, ids: &[PermissionId]) -> Result<Vec<PermissionRecord>, DbError> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}
		let sql = format!(
			"SELECT id, resource, action FROM permissions WHERE id IN ({}) ORDER BY created_at, rowid",
			placeholders(ids.len())
		);
		let mut query = sqlx::query(&sql);
		for id in ids {
			query = query.bind(id.to_string());
		}
		let rows = query.fetch_all(&self.pool).await?;

		rows.iter().map(parse_permission_row).collect()
	}

	/// Insert a permission.
	///
	/// # Database Constraints
	/// - `(resource, action)` must be unique
	#[tracing::instrument(skip(self))]
	pub async fn create(&self, resource: &str, action: &str) -> Result<PermissionRecord, DbError> {
		let record = PermissionRecord::new(resource, action);

		sqlx::query(
			r#"
			INSERT INTO permissions (id, resource, action, created_at)
			VALUES (?, ?, ?, ?)
			"#,
		)
		.bind(record.id.to_string())
		.bind(&record.resource)
		.bind(&record.action)
		.bind(Utc::now().to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(permission_id = %record.id, "permission created");
		Ok(record)
	}

	#[tracing::instrument(skip(self, update), fields(permission_id = %id))]
	pub async fn update(
		&self,
		id: &PermissionId,
		update: &PermissionUpdate,
	) -> Result<Option<PermissionRecord>, DbError> {
		let mut tx = self.pool.begin().await?;

		let row = sqlx::query("SELECT id, resource, action FROM permissions WHERE id = ?")
			.bind(id.to_string())
			.fetch_optional(&mut *tx)
			.await?;
		let Some(row) = row else {
			return Ok(None);
		};
		let mut record = parse_permission_row(&row)?;
		if let Some(resource) = &update.resource {
			record.resource = resource.clone();
		}
		if let Some(action) = &update.action {
			record.action = action.clone();
		}

		sqlx::query("UPDATE permissions SET resource = ?, action = ? WHERE id = ?")
			.bind(&record.resource)
			.bind(&record.action)
			.bind(id.to_string())
			.execute(&mut *tx)
			.await?;

		tx.commit().await?;
		tracing::debug!("permission updated");
		Ok(Some(record))
	}

	/// Delete a permission and, by cascade, its role assignments.
	#[tracing::instrument(skip(self), fields(permission_id = %id))]
	pub async fn delete(&self, id: &PermissionId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM permissions WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}

fn parse_permission_row(row: &sqlx::sqlite::SqliteRow) -> Result<PermissionRecord, DbError> {
	let id: String = row.get("id");

	Ok(PermissionRecord {
		id: PermissionId::new(parse_uuid(&id, "permission")?),
		resource: row.get("resource"),
		action: row.get("action"),
	})
}

#[async_trait]
impl PermissionStore for PermissionRepository {
	async fn list(&self) -> Result<Vec<PermissionRecord>, StoreError> {
		Ok(self.list().await?)
	}

	async fn find_by_id(&self, id: &PermissionId) -> Result<Option<PermissionRecord>, StoreError> {
		Ok(self.find_by_id(id).await?)
	}

	async fn find_by_ids(&self, ids: &[PermissionId]) -> Result<Vec<PermissionRecord>, StoreError> {
		Ok(self.find_by_ids(ids).await?)
	}

	async fn create(&self, resource: &str, action: &str) -> Result<PermissionRecord, StoreError> {
		Ok(self.create(resource, action).await?)
	}

	async fn update(
		&self,
		id: &PermissionId,
		update: &PermissionUpdate,
	) -> Result<Option<PermissionRecord>, StoreError> {
		Ok(self.update(id, update).await?)
	}

	async fn delete(&self, id: &PermissionId) -> Result<bool, StoreError> {
		Ok(self.delete(id).await?)
	}
}
