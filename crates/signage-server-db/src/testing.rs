// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::error::DbError;

/// In-memory pool pinned to one connection so every query sees the same
/// database.
pub async fn create_test_pool() -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(":memory:")?.foreign_keys(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect_with(options)
		.await?;
	Ok(pool)
}

/// In-memory pool with the RBAC schema applied.
pub async fn create_rbac_test_pool() -> Result<SqlitePool, DbError> {
	let pool = create_test_pool().await?;
	crate::run_migrations(&pool).await?;
	Ok(pool)
}
