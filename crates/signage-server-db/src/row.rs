// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Column decoding helpers shared by the repositories.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DbError;

pub(crate) fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
	Uuid::parse_str(value).map_err(|e| DbError::Internal(format!("Invalid {what} ID: {e}")))
}

pub(crate) fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

/// `?, ?, ?` with one placeholder per bound value.
pub(crate) fn placeholders(count: usize) -> String {
	vec!["?"; count].join(", ")
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn placeholders_match_count() {
		assert_eq!(placeholders(1), "?");
		assert_eq!(placeholders(3), "?, ?, ?");
	}

	#[test]
	fn bad_values_are_internal_errors() {
		assert!(matches!(
			parse_uuid("nope", "user"),
			Err(DbError::Internal(_))
		));
		assert!(matches!(
			parse_timestamp("yesterday", "created_at"),
			Err(DbError::Internal(_))
		));
	}

	#[test]
	fn timestamps_round_trip_rfc3339() {
		let now = Utc::now();
		let parsed = parse_timestamp(&now.to_rfc3339(), "created_at").unwrap();
		assert_eq!(parsed, now);
	}

	proptest! {
		#[test]
		fn placeholder_count_matches_ids(count in 1usize..64) {
			let sql = placeholders(count);
			prop_assert_eq!(sql.matches('?').count(), count);
		}
	}
}
