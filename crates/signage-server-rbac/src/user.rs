// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User entity and its create/update inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// A user that can be assigned roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Stable identifier.
	pub id: UserId,

	/// Unique email address.
	pub email: String,

	/// Display name.
	pub name: String,

	/// Whether the account is enabled.
	pub is_active: bool,

	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl User {
	/// Creates a new user with a fresh id and both timestamps set to now.
	pub fn new(email: impl Into<String>, name: impl Into<String>, is_active: bool) -> Self {
		let now = Utc::now();
		Self {
			id: UserId::generate(),
			email: email.into(),
			name: name.into(),
			is_active,
			created_at: now,
			updated_at: now,
		}
	}

	/// Apply a partial update, touching `updated_at`.
	pub fn apply(&mut self, update: UserUpdate) {
		if let Some(email) = update.email {
			self.email = email;
		}
		if let Some(name) = update.name {
			self.name = name;
		}
		if let Some(is_active) = update.is_active {
			self.is_active = is_active;
		}
		self.updated_at = Utc::now();
	}
}

/// Input for creating a user. `is_active` defaults to `true` when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
	pub email: String,
	pub name: String,
	#[serde(default)]
	pub is_active: Option<bool>,
}

/// Partial user update; only present fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn apply_keeps_omitted_fields() {
		let mut user = User::new("a@example.com", "Alice", true);
		user.apply(UserUpdate {
			name: Some("Alicia".to_string()),
			..Default::default()
		});

		assert_eq!(user.name, "Alicia");
		assert_eq!(user.email, "a@example.com");
		assert!(user.is_active);
		assert!(user.updated_at >= user.created_at);
	}

	#[test]
	fn new_user_is_active_defaults_to_none_when_absent() {
		let input: NewUser =
			serde_json::from_str(r#"{"email":"b@example.com","name":"Bob"}"#).unwrap();
		assert_eq!(input.is_active, None);
	}
}
