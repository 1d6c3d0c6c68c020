// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use super::Stores;
use crate::error::Result;
use crate::permission::Permission;
use crate::store::AuthorizationStore;
use crate::types::UserId;

/// Evaluates whether a user holds a required permission.
///
/// The effective permission set is fetched fresh on every call.
#[derive(Clone)]
pub struct Authorizer {
	authorization: Arc<dyn AuthorizationStore>,
}

impl Authorizer {
	pub fn new(stores: &Stores) -> Self {
		Self {
			authorization: stores.authorization.clone(),
		}
	}

	/// Returns `true` iff any of the user's permissions matches `required`.
	///
	/// # Errors
	///
	/// - [`crate::RbacError::Validation`] if `required` is not `resource:action`
	/// - [`crate::RbacError::Store`] if the permission lookup fails
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn check_permission(&self, user_id: &UserId, required: &str) -> Result<bool> {
		let required = Permission::parse(required)?;
		self.check(user_id, &required).await
	}

	/// Like [`Self::check_permission`] for an already parsed permission.
	#[tracing::instrument(skip(self), fields(user_id = %user_id, required = %required))]
	pub async fn check(&self, user_id: &UserId, required: &Permission) -> Result<bool> {
		let owned = self.authorization.find_permissions_for_user(user_id).await?;
		let allowed = owned.iter().any(|perm| perm.matches(required));
		tracing::debug!(owned = owned.len(), allowed, "permission check");
		Ok(allowed)
	}
}
