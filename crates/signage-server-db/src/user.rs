// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository for database operations.

use async_trait::async_trait;
use signage_server_rbac::{NewUser, StoreError, User, UserId, UserStore, UserUpdate};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{parse_timestamp, parse_uuid, placeholders};

const USER_COLUMNS: &str = "id, email, name, is_active, created_at, updated_at";

/// Repository for user rows.
#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self))]
	pub async fn list(&self) -> Result<Vec<User>, DbError> {
		let rows = sqlx::query(&format!(
			"SELECT {USER_COLUMNS} FROM users ORDER BY created_at, rowid"
		))
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_user_row).collect()
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(parse_user_row).transpose()
	}

	#[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
	pub async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, DbError> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}
		let sql = format!(
			"SELECT {USER_COLUMNS} FROM users WHERE id IN ({}) ORDER BY created_at, rowid",
			placeholders(ids.len())
		);
		let mut query = sqlx::query(&sql);
		for id in ids {
			query = query.bind(id.to_string());
		}
		let rows = query.fetch_all(&self.pool).await?;

		rows.iter().map(parse_user_row).collect()
	}

	#[tracing::instrument(skip(self))]
	pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
		let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
			.bind(email)
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(parse_user_row).transpose()
	}

	/// Insert a user.
	///
	/// # Database Constraints
	/// - `email` must be unique
	#[tracing::instrument(skip(self, input), fields(email = %input.email))]
	pub async fn create(&self, input: &NewUser) -> Result<User, DbError> {
		let user = User::new(&input.email, &input.name, input.is_active.unwrap_or(true));

		sqlx::query(
			r#"
			INSERT INTO users (id, email, name, is_active, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(user.id.to_string())
		.bind(&user.email)
		.bind(&user.name)
		.bind(user.is_active)
		.bind(user.created_at.to_rfc3339())
		.bind(user.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(user_id = %user.id, "user created");
		Ok(user)
	}

	/// Apply a partial update, returning `None` if the user does not exist.
	#[tracing::instrument(skip(self, update), fields(user_id = %id))]
	pub async fn update(&self, id: &UserId, update: &UserUpdate) -> Result<Option<User>, DbError> {
		let mut tx = self.pool.begin().await?;

		let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
			.bind(id.to_string())
			.fetch_optional(&mut *tx)
			.await?;
		let Some(row) = row else {
			return Ok(None);
		};
		let mut user = parse_user_row(&row)?;
		user.apply(update.clone());

		sqlx::query(
			r#"
			UPDATE users
			SET email = ?, name = ?, is_active = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&user.email)
		.bind(&user.name)
		.bind(user.is_active)
		.bind(user.updated_at.to_rfc3339())
		.bind(id.to_string())
		.execute(&mut *tx)
		.await?;

		tx.commit().await?;
		tracing::debug!("user updated");
		Ok(Some(user))
	}

	/// Delete a user. Role assignments go with it via `ON DELETE CASCADE`.
	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn delete(&self, id: &UserId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM users WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}

fn parse_user_row(row: &sqlx::sqlite::SqliteRow) -> Result<User, DbError> {
	let id: String = row.get("id");
	let is_active: i64 = row.get("is_active");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(User {
		id: UserId::new(parse_uuid(&id, "user")?),
		email: row.get("email"),
		name: row.get("name"),
		is_active: is_active != 0,
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}

#[async_trait]
impl UserStore for UserRepository {
	async fn list(&self) -> Result<Vec<User>, StoreError> {
		Ok(self.list().await?)
	}

	async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
		Ok(self.find_by_id(id).await?)
	}

	async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, StoreError> {
		Ok(self.find_by_ids(ids).await?)
	}

	async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
		Ok(self.find_by_email(email).await?)
	}

	async fn create(&self, input: &NewUser) -> Result<User, StoreError> {
		Ok(self.create(input).await?)
	}

	async fn update(&self, id: &UserId, update: &UserUpdate) -> Result<Option<User>, StoreError> {
		Ok(self.update(id, update).await?)
	}

	async fn delete(&self, id: &UserId) -> Result<bool, StoreError> {
		Ok(self.delete(id).await?)
	}
}
