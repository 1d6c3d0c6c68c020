// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error payloads and the mapping from RBAC errors to HTTP status codes.

use axum::{
	extract::rejection::JsonRejection,
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::{Deserialize, Serialize};
use signage_server_rbac::{RbacError, StoreError};

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

impl ErrorResponse {
	pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			message: message.into(),
		}
	}
}

fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
	(status, Json(ErrorResponse::new(error, message))).into_response()
}

/// Create a 400 Bad Request response.
pub fn bad_request(message: impl Into<String>) -> Response {
	error_response(StatusCode::BAD_REQUEST, "bad_request", message)
}

/// Create a 401 Unauthorized response.
pub fn unauthorized() -> Response {
	error_response(
		StatusCode::UNAUTHORIZED,
		"unauthorized",
		"Authentication required",
	)
}

/// Create a 403 Forbidden response.
pub fn forbidden(message: impl Into<String>) -> Response {
	error_response(StatusCode::FORBIDDEN, "forbidden", message)
}

/// Create a 404 Not Found response.
pub fn not_found(message: impl Into<String>) -> Response {
	error_response(StatusCode::NOT_FOUND, "not_found", message)
}

/// Create a 409 Conflict response.
pub fn conflict(message: impl Into<String>) -> Response {
	error_response(StatusCode::CONFLICT, "conflict", message)
}

/// Create a 500 Internal Server Error response.
///
/// The message is generic; details belong in the logs.
pub fn internal_error() -> Response {
	error_response(
		StatusCode::INTERNAL_SERVER_ERROR,
		"internal_error",
		"Internal server error",
	)
}

/// Handler error, rendered as an [`ErrorResponse`].
#[derive(Debug)]
pub enum ApiError {
	BadRequest(String),
	Rbac(RbacError),
}

impl From<RbacError> for ApiError {
	fn from(err: RbacError) -> Self {
		ApiError::Rbac(err)
	}
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		ApiError::BadRequest(rejection.body_text())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		match self {
			ApiError::BadRequest(message) => bad_request(message),
			ApiError::Rbac(RbacError::NotFound(message)) => not_found(message),
			ApiError::Rbac(RbacError::Forbidden(message)) => forbidden(message),
			ApiError::Rbac(RbacError::Validation(e)) => bad_request(e.to_string()),
			ApiError::Rbac(RbacError::Store(StoreError::Conflict(message))) => conflict(message),
			ApiError::Rbac(RbacError::Store(e)) => {
				tracing::error!(error = %e, "store failure while handling request");
				internal_error()
			}
		}
	}
}

/// Parse a path segment into an id, mapping failures to 400.
pub fn parse_id<T: std::str::FromStr>(value: &str, what: &str) -> Result<T, ApiError> {
	value
		.parse()
		.map_err(|_| ApiError::BadRequest(format!("Invalid {what} ID: '{value}'")))
}

/// Reject empty or whitespace-only text fields with 400.
pub fn require_non_blank(value: &str, what: &str) -> Result<(), ApiError> {
	if value.trim().is_empty() {
		return Err(ApiError::BadRequest(format!("{what} must not be empty")));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use signage_server_rbac::{PermissionError, RoleId};

	fn status(err: RbacError) -> StatusCode {
		ApiError::from(err).into_response().status()
	}

	#[test]
	fn rbac_errors_map_to_status_codes() {
		assert_eq!(status(RbacError::not_found("x")), StatusCode::NOT_FOUND);
		assert_eq!(status(RbacError::forbidden("x")), StatusCode::FORBIDDEN);
		assert_eq!(
			status(PermissionError::Malformed("x".to_string()).into()),
			StatusCode::BAD_REQUEST
		);
		assert_eq!(
			status(StoreError::Conflict("dup".to_string()).into()),
			StatusCode::CONFLICT
		);
		assert_eq!(
			status(StoreError::Backend("io".to_string()).into()),
			StatusCode::INTERNAL_SERVER_ERROR
		);
	}

	#[test]
	fn parse_id_rejects_garbage() {
		assert!(parse_id::<RoleId>("not-a-uuid", "role").is_err());
		let id = RoleId::generate();
		assert_eq!(parse_id::<RoleId>(&id.to_string(), "role").unwrap(), id);
	}

	#[test]
	fn require_non_blank_rejects_whitespace() {
		assert!(require_non_blank("ops@example.com", "Email").is_ok());
		let err = require_non_blank(" \t", "Email").unwrap_err();
		assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Email must not be empty"));
	}
}
