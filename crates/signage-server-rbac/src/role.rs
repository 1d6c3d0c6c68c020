// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role entity and its create/update inputs.
//!
//! Roles flagged `is_system` can be read, updated and have permissions
//! assigned, but never deleted.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::RoleId;

/// A named bundle of permissions assignable to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
	pub id: RoleId,
	pub name: String,
	pub description: Option<String>,
	/// Protected from deletion.
	pub is_system: bool,
}

impl Role {
	pub fn new(name: impl Into<String>, description: Option<String>, is_system: bool) -> Self {
		Self {
			id: RoleId::generate(),
			name: name.into(),
			description,
			is_system,
		}
	}

	pub fn apply(&mut self, update: RoleUpdate) {
		if let Some(name) = update.name {
			self.name = name;
		}
		if let Some(description) = update.description {
			self.description = description;
		}
	}
}

/// Input for creating a role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRole {
	pub name: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub is_system: Option<bool>,
}

impl NewRole {
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}
}

/// Partial role update.
///
/// `description` is doubly optional: `None` leaves it unchanged,
/// `Some(None)` clears it, `Some(Some(_))` replaces it. In JSON an absent key
/// is `None` and an explicit `null` is `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleUpdate {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(
		default,
		deserialize_with = "present_or_null",
		skip_serializing_if = "Option::is_none"
	)]
	pub description: Option<Option<String>>,
}

fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn update_distinguishes_absent_from_null() {
		let absent: RoleUpdate = serde_json::from_str(r#"{"name":"Ops"}"#).unwrap();
		assert_eq!(absent.description, None);

		let null: RoleUpdate = serde_json::from_str(r#"{"description":null}"#).unwrap();
		assert_eq!(null.description, Some(None));

		let set: RoleUpdate = serde_json::from_str(r#"{"description":"d"}"#).unwrap();
		assert_eq!(set.description, Some(Some("d".to_string())));
	}

	#[test]
	fn apply_clears_description_on_explicit_null() {
		let mut role = Role::new("Editor", Some("Edits".to_string()), false);
		role.apply(RoleUpdate {
			name: None,
			description: Some(None),
		});
		assert_eq!(role.name, "Editor");
		assert_eq!(role.description, None);
	}

	#[test]
	fn apply_keeps_description_when_absent() {
		let mut role = Role::new("Editor", Some("Edits".to_string()), false);
		role.apply(RoleUpdate {
			name: Some("Writer".to_string()),
			description: None,
		});
		assert_eq!(role.name, "Writer");
		assert_eq!(role.description.as_deref(), Some("Edits"));
	}
}
