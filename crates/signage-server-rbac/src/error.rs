// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error taxonomy for the RBAC services and the stores they depend on.
//!
//! Services return [`RbacError`]; mapping to HTTP status codes belongs to the
//! transport layer.

use crate::permission::PermissionError;

/// Failure reported by a store implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
	/// A uniqueness constraint rejected the write.
	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Store error: {0}")]
	Backend(String),
}

impl StoreError {
	pub fn is_conflict(&self) -> bool {
		matches!(self, StoreError::Conflict(_))
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RbacError {
	/// The referenced entity id does not exist.
	#[error("Not found: {0}")]
	NotFound(String),

	/// The operation is structurally disallowed, e.g. deleting a system role.
	#[error("Forbidden: {0}")]
	Forbidden(String),

	#[error("Validation error: {0}")]
	Validation(#[from] PermissionError),

	#[error(transparent)]
	Store(#[from] StoreError),
}

impl RbacError {
	pub fn not_found(msg: impl Into<String>) -> Self {
		RbacError::NotFound(msg.into())
	}

	pub fn forbidden(msg: impl Into<String>) -> Self {
		RbacError::Forbidden(msg.into())
	}
}

pub type Result<T> = std::result::Result<T, RbacError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn store_errors_convert_transparently() {
		let err: RbacError = StoreError::Backend("disk full".to_string()).into();
		assert_eq!(err.to_string(), "Store error: disk full");
	}

	#[test]
	fn permission_errors_become_validation() {
		let err: RbacError = PermissionError::Malformed("x".to_string()).into();
		assert!(matches!(err, RbacError::Validation(_)));
	}
}
