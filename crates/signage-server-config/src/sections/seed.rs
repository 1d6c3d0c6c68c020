// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Seeding defaults used by the operator CLI.

use serde::Deserialize;

pub const DEFAULT_SUPER_ADMIN_EMAIL: &str = "test@example.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
	/// Email used by `assign-super-admin` when none is given.
	pub super_admin_email: String,
}

impl Default for SeedConfig {
	fn default() -> Self {
		Self {
			super_admin_email: DEFAULT_SUPER_ADMIN_EMAIL.to_string(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfigLayer {
	#[serde(default)]
	pub super_admin_email: Option<String>,
}

impl SeedConfigLayer {
	pub fn merge(&mut self, other: SeedConfigLayer) {
		if other.super_admin_email.is_some() {
			self.super_admin_email = other.super_admin_email;
		}
	}

	pub fn finalize(self) -> SeedConfig {
		SeedConfig {
			super_admin_email: self
				.super_admin_email
				.unwrap_or_else(|| DEFAULT_SUPER_ADMIN_EMAIL.to_string()),
		}
	}
}
