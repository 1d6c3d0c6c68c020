// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use signage_server_rbac::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Internal: {0}")]
	Internal(String),
}

impl DbError {
	/// Whether the error is a SQLite UNIQUE or PRIMARY KEY violation.
	pub fn is_unique_violation(&self) -> bool {
		match self {
			DbError::Conflict(_) => true,
			DbError::Sqlx(sqlx::Error::Database(e)) => e.is_unique_violation(),
			_ => false,
		}
	}
}

impl From<DbError> for StoreError {
	fn from(err: DbError) -> Self {
		match err {
			DbError::Conflict(msg) => StoreError::Conflict(msg),
			DbError::Sqlx(sqlx::Error::Database(e)) if e.is_unique_violation() => {
				StoreError::Conflict(e.message().to_string())
			}
			other => StoreError::Backend(other.to_string()),
		}
	}
}

pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn conflict_maps_to_store_conflict() {
		let err: StoreError = DbError::Conflict("dup".to_string()).into();
		assert_eq!(err, StoreError::Conflict("dup".to_string()));
	}

	#[test]
	fn other_errors_map_to_backend() {
		let err: StoreError = DbError::Internal("bad row".to_string()).into();
		assert_eq!(err, StoreError::Backend("Internal: bad row".to_string()));

		let err: StoreError = DbError::Sqlx(sqlx::Error::RowNotFound).into();
		assert!(matches!(err, StoreError::Backend(_)));
	}
}
