// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Route-level permission checks.
//!
//! Token verification happens upstream and leaves an [`AuthSubject`] in the
//! request extensions. [`RequirePermission`] reads its `sub` claim and asks the
//! [`Authorizer`] whether that user holds the route's `resource:action`.
//!
//! - missing subject, empty `sub` or a `sub` that is not a user id: 401
//! - permission not held: 403
//! - store failure or a malformed route permission: 500
//!
//! # Example
//!
//! ```ignore
//! Router::new()
//!     .route("/roles", get(list_roles.layer(RequirePermission::new(authorizer, "roles:read"))))
//! ```

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{body::Body, http::Request, response::Response};
use futures::future::BoxFuture;
use signage_server_rbac::{Authorizer, Permission, UserId};
use tower::{Layer, Service};

use crate::api_response::{forbidden, internal_error, unauthorized};

/// Verified token claims relevant to authorization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSubject {
	/// Subject claim; the user id as a string.
	pub sub: Option<String>,
}

impl AuthSubject {
	pub fn new(sub: impl Into<String>) -> Self {
		Self {
			sub: Some(sub.into()),
		}
	}

	pub fn for_user(user_id: &UserId) -> Self {
		Self::new(user_id.to_string())
	}

	/// The subject as a user id, if present and well formed.
	pub fn user_id(&self) -> Option<UserId> {
		let sub = self.sub.as_deref()?.trim();
		if sub.is_empty() {
			return None;
		}
		sub.parse().ok()
	}
}

/// Layer that admits a request only if its subject holds `permission`.
#[derive(Clone)]
pub struct RequirePermission {
	authorizer: Authorizer,
	permission: Arc<str>,
}

impl RequirePermission {
	pub fn new(authorizer: Authorizer, permission: impl AsRef<str>) -> Self {
		Self {
			authorizer,
			permission: Arc::from(permission.as_ref()),
		}
	}

	pub fn permission(&self) -> &str {
		&self.permission
	}
}

impl<S> Layer<S> for RequirePermission {
	type Service = RequirePermissionService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		RequirePermissionService {
			inner,
			authorizer: self.authorizer.clone(),
			permission: self.permission.clone(),
		}
	}
}

/// Service wrapper for [`RequirePermission`].
#[derive(Clone)]
pub struct RequirePermissionService<S> {
	inner: S,
	authorizer: Authorizer,
	permission: Arc<str>,
}

impl<S> Service<Request<Body>> for RequirePermissionService<S>
where
	S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
	S::Future: Send,
{
	type Response = Response;
	type Error = S::Error;
	type Future = BoxFuture<'static, Result<Response, S::Error>>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		// The readied service handles this request; a fresh clone takes its place.
		let clone = self.inner.clone();
		let mut inner = std::mem::replace(&mut self.inner, clone);
		let authorizer = self.authorizer.clone();
		let permission = self.permission.clone();

		Box::pin(async move {
			let Some(user_id) = req
				.extensions()
				.get::<AuthSubject>()
				.and_then(AuthSubject::user_id)
			else {
				tracing::debug!(permission = %permission, "permission denied: not authenticated");
				return Ok(unauthorized());
			};

			let required = match Permission::parse(&permission) {
				Ok(required) => required,
				Err(e) => {
					tracing::error!(permission = %permission, error = %e, "route configured with malformed permission");
					return Ok(internal_error());
				}
			};

			match authorizer.check(&user_id, &required).await {
				Ok(true) => {
					tracing::debug!(user_id = %user_id, permission = %required, "permission granted");
					inner.call(req).await
				}
				Ok(false) => {
					tracing::info!(user_id = %user_id, permission = %required, "permission denied");
					Ok(forbidden("Insufficient permissions"))
				}
				Err(e) => {
					tracing::error!(user_id = %user_id, permission = %required, error = %e, "permission check failed");
					Ok(internal_error())
				}
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{handler::Handler, http::StatusCode, routing::get, Router};
	use proptest::prelude::*;
	use signage_server_rbac::{MemoryStore, NewRole, NewUser, RbacServices, Stores};
	use tower::ServiceExt;

	async fn dummy_handler() -> &'static str {
		"ok"
	}

	async fn services_with_reader() -> (RbacServices, UserId) {
		let rbac = RbacServices::new(Stores::from_shared(MemoryStore::new()));
		let user = rbac
			.users
			.create(NewUser {
				email: "reader@example.com".to_string(),
				name: "Reader".to_string(),
				is_active: None,
			})
			.await
			.unwrap();
		let role = rbac.roles.create(NewRole::named("Reader")).await.unwrap();
		let read = rbac.permissions.create("content", "read").await.unwrap();
		rbac
			.roles
			.set_role_permissions(&role.id, &[read.id])
			.await
			.unwrap();
		rbac.users.set_user_roles(&user.id, &[role.id]).await.unwrap();
		(rbac, user.id)
	}

	fn app(rbac: &RbacServices, permission: &str) -> Router {
		Router::new().route(
			"/",
			get(dummy_handler.layer(RequirePermission::new(rbac.authorizer.clone(), permission))),
		)
	}

	fn request(subject: Option<AuthSubject>) -> Request<Body> {
		let mut req = Request::get("/").body(Body::empty()).unwrap();
		if let Some(subject) = subject {
			req.extensions_mut().insert(subject);
		}
		req
	}

	#[tokio::test]
	async fn missing_subject_is_unauthorized() {
		let (rbac, _) = services_with_reader().await;
		let resp = app(&rbac, "content:read")
			.oneshot(request(None))
			.await
			.unwrap();
		assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
	}

	#[tokio::test]
	async fn empty_or_garbage_sub_is_unauthorized() {
		let (rbac, _) = services_with_reader().await;
		for subject in [
			AuthSubject::default(),
			AuthSubject::new(""),
			AuthSubject::new("not-a-uuid"),
		] {
			let resp = app(&rbac, "content:read")
				.oneshot(request(Some(subject)))
				.await
				.unwrap();
			assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
		}
	}

	#[tokio::test]
	async fn held_permission_reaches_handler() {
		let (rbac, user_id) = services_with_reader().await;
		let resp = app(&rbac, "content:read")
			.oneshot(request(Some(AuthSubject::for_user(&user_id))))
			.await
			.unwrap();
		assert_eq!(resp.status(), StatusCode::OK);
	}

	#[tokio::test]
	async fn missing_permission_is_forbidden() {
		let (rbac, user_id) = services_with_reader().await;
		let resp = app(&rbac, "content:delete")
			.oneshot(request(Some(AuthSubject::for_user(&user_id))))
			.await
			.unwrap();
		assert_eq!(resp.status(), StatusCode::FORBIDDEN);
	}

	#[tokio::test]
	async fn malformed_route_permission_is_internal_error() {
		let (rbac, user_id) = services_with_reader().await;
		let resp = app(&rbac, "content")
			.oneshot(request(Some(AuthSubject::for_user(&user_id))))
			.await
			.unwrap();
		assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}

	#[test]
	fn subject_round_trips_user_id() {
		let id = UserId::generate();
		assert_eq!(AuthSubject::for_user(&id).user_id(), Some(id));
		assert_eq!(AuthSubject::new(format!(" {id} ")).user_id(), Some(id));
	}

	proptest! {
		#[test]
		fn non_uuid_subjects_are_rejected(sub in "[g-z]{0,40}") {
			prop_assert_eq!(AuthSubject::new(sub).user_id(), None);
		}
	}
}
