// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission values and the matching algorithm.
//!
//! A [`Permission`] is a `resource:action` capability. Two tokens are reserved:
//!
//! - resource [`WILDCARD_RESOURCE`] (`*`) matches any required resource
//! - action [`MANAGE_ACTION`] (`manage`) satisfies any required action on the
//!   matched resource scope
//!
//! This gives four tiers, broadest first:
//!
//! ```text
//! *:manage  >  resource:manage  >  *:action  >  resource:action
//! ```
//!
//! [`PermissionRecord`] is the stored form, carrying a [`PermissionId`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::PermissionId;

/// Resource token that matches every resource.
pub const WILDCARD_RESOURCE: &str = "*";

/// Action token that satisfies every action on its resource scope.
pub const MANAGE_ACTION: &str = "manage";

const SEPARATOR: char = ':';

/// Errors produced when a permission string or segment is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
	#[error("permission must be in resource:action format, got '{0}'")]
	Malformed(String),

	#[error("permission '{0}' has more than one ':' separator")]
	TooManySegments(String),

	#[error("permission {0} must not be empty")]
	EmptySegment(&'static str),

	#[error("permission {field} '{value}' must not contain ':'")]
	InvalidSegment { field: &'static str, value: String },
}

/// An owned or required `(resource, action)` capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
	pub resource: String,
	pub action: String,
}

impl Permission {
	/// Build a permission from a known pair without validation.
	///
	/// Used for values loaded from storage, which were validated on creation.
	pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
		Self {
			resource: resource.into(),
			action: action.into(),
		}
	}

	/// The `*:manage` permission, which matches everything.
	pub fn super_admin() -> Self {
		Self::new(WILDCARD_RESOURCE, MANAGE_ACTION)
	}

	/// Parse a `resource:action` string.
	///
	/// # Errors
	///
	/// - [`PermissionError::Malformed`] if there is no `:` or a segment is empty
	/// - [`PermissionError::TooManySegments`] for inputs like `a:b:c`
	pub fn parse(value: &str) -> Result<Self, PermissionError> {
		let mut parts = value.split(SEPARATOR);
		let resource = parts.next().unwrap_or_default();
		let action = parts.next().unwrap_or_default();

		if resource.is_empty() || action.is_empty() {
			return Err(PermissionError::Malformed(value.to_string()));
		}
		if parts.next().is_some() {
			return Err(PermissionError::TooManySegments(value.to_string()));
		}

		Ok(Self::new(resource, action))
	}

	/// Check that a resource/action pair can be stored and later parsed back.
	pub fn validate_parts(resource: &str, action: &str) -> Result<(), PermissionError> {
		validate_segment("resource", resource)?;
		validate_segment("action", action)
	}

	/// Whether this owned permission satisfies `required`.
	pub fn matches(&self, required: &Permission) -> bool {
		let resource_matches =
			self.resource == WILDCARD_RESOURCE || self.resource == required.resource;
		if !resource_matches {
			return false;
		}

		if self.action == MANAGE_ACTION {
			return true;
		}

		self.action == required.action
	}

	/// Key used to deduplicate permissions by their natural pair.
	pub fn key(&self) -> String {
		self.to_string()
	}
}

fn validate_segment(field: &'static str, value: &str) -> Result<(), PermissionError> {
	if value.is_empty() {
		return Err(PermissionError::EmptySegment(field));
	}
	if value.contains(SEPARATOR) {
		return Err(PermissionError::InvalidSegment {
			field,
			value: value.to_string(),
		});
	}
	Ok(())
}

impl fmt::Display for Permission {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}{}", self.resource, SEPARATOR, self.action)
	}
}

impl FromStr for Permission {
	type Err = PermissionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

/// A permission row as persisted by a [`crate::store::PermissionStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
	pub id: PermissionId,
	pub resource: String,
	pub action: String,
}

impl PermissionRecord {
	pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
		Self {
			id: PermissionId::generate(),
			resource: resource.into(),
			action: action.into(),
		}
	}

	pub fn permission(&self) -> Permission {
		Permission::new(&self.resource, &self.action)
	}

	pub fn is_pair(&self, resource: &str, action: &str) -> bool {
		self.resource == resource && self.action == action
	}
}

/// Partial update for a stored permission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionUpdate {
	#[serde(default)]
	pub resource: Option<String>,
	#[serde(default)]
	pub action: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn p(value: &str) -> Permission {
		Permission::parse(value).unwrap()
	}

	#[test]
	fn parse_splits_resource_and_action() {
		let perm = p("content:read");
		assert_eq!(perm.resource, "content");
		assert_eq!(perm.action, "read");
	}

	#[test]
	fn parse_rejects_missing_colon() {
		assert_eq!(
			Permission::parse("content"),
			Err(PermissionError::Malformed("content".to_string()))
		);
	}

	#[test]
	fn parse_rejects_empty_segments() {
		assert!(Permission::parse(":read").is_err());
		assert!(Permission::parse("content:").is_err());
		assert!(Permission::parse(":").is_err());
		assert!(Permission::parse("").is_err());
	}

	#[test]
	fn parse_rejects_extra_segments() {
		assert_eq!(
			Permission::parse("a:b:c"),
			Err(PermissionError::TooManySegments("a:b:c".to_string()))
		);
	}

	#[test]
	fn wildcard_resource_matches_same_action_only() {
		let owned = Permission::new("*", "read");
		assert!(owned.matches(&Permission::new("content", "read")));
		assert!(!owned.matches(&Permission::new("content", "update")));
	}

	#[test]
	fn manage_absorbs_actions_on_its_resource() {
		let owned = Permission::new("content", "manage");
		assert!(owned.matches(&Permission::new("content", "delete")));
		assert!(!owned.matches(&Permission::new("devices", "delete")));
	}

	#[test]
	fn exact_match_requires_both_parts() {
		let owned = p("users:read");
		assert!(owned.matches(&p("users:read")));
		assert!(!owned.matches(&p("users:create")));
		assert!(!owned.matches(&p("roles:read")));
	}

	#[test]
	fn validate_parts_rejects_colons_and_empties() {
		assert!(Permission::validate_parts("content", "read").is_ok());
		assert_eq!(
			Permission::validate_parts("", "read"),
			Err(PermissionError::EmptySegment("resource"))
		);
		assert!(matches!(
			Permission::validate_parts("content", "re:ad"),
			Err(PermissionError::InvalidSegment { field: "action", .. })
		));
	}

	#[test]
	fn display_renders_resource_action() {
		assert_eq!(Permission::super_admin().to_string(), "*:manage");
	}

	fn segment() -> impl Strategy<Value = String> {
		"[a-z*_]{1,12}"
	}

	proptest! {
		#[test]
		fn parse_round_trips_colon_free_pairs(resource in segment(), action in segment()) {
			let parsed = Permission::parse(&format!("{resource}:{action}")).unwrap();
			prop_assert_eq!(parsed.resource, resource);
			prop_assert_eq!(parsed.action, action);
		}

		#[test]
		fn matches_is_reflexive(resource in segment(), action in segment()) {
			let perm = Permission::new(resource, action);
			prop_assert!(perm.matches(&perm));
		}

		#[test]
		fn super_admin_matches_anything(resource in segment(), action in segment()) {
			prop_assert!(Permission::super_admin().matches(&Permission::new(resource, action)));
		}

		#[test]
		fn strings_without_colon_never_parse(value in "[a-z]{0,16}") {
			prop_assert!(Permission::parse(&value).is_err());
		}
	}
}
