// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! RBAC admin routes.
//!
//! Every endpoint is wrapped in [`RequirePermission`] individually, so two
//! methods on the same path can demand different permissions.

pub mod permissions;
pub mod roles;
pub mod users;

use axum::{
	handler::Handler,
	routing::{get, MethodRouter},
	Router,
};
use signage_server_rbac::RbacServices;

use crate::permission_middleware::RequirePermission;

/// Shared state for the admin handlers.
#[derive(Clone)]
pub struct ApiState {
	pub rbac: RbacServices,
}

impl ApiState {
	pub fn new(rbac: RbacServices) -> Self {
		Self { rbac }
	}

	fn require(&self, permission: &str) -> RequirePermission {
		RequirePermission::new(self.rbac.authorizer.clone(), permission)
	}
}

/// Build the admin router for roles, permissions and users.
pub fn rbac_router(state: ApiState) -> Router {
	let guard = |permission: &str| state.require(permission);

	let roles: MethodRouter<ApiState> = get(roles::list_roles.layer(guard("roles:read")))
		.post(roles::create_role.layer(guard("roles:create")));
	let role: MethodRouter<ApiState> = get(roles::get_role.layer(guard("roles:read")))
		.patch(roles::update_role.layer(guard("roles:update")))
		.delete(roles::delete_role.layer(guard("roles:delete")));
	let role_permissions: MethodRouter<ApiState> =
		get(roles::get_role_permissions.layer(guard("roles:read")))
			.put(roles::set_role_permissions.layer(guard("roles:update")));
	let role_users: MethodRouter<ApiState> =
		get(roles::get_role_users.layer(guard("roles:read")));

	let permissions: MethodRouter<ApiState> =
		get(permissions::list_permissions.layer(guard("roles:read")));

	let users: MethodRouter<ApiState> = get(users::list_users.layer(guard("users:read")))
		.post(users::create_user.layer(guard("users:create")));
	let user: MethodRouter<ApiState> = get(users::get_user.layer(guard("users:read")))
		.patch(users::update_user.layer(guard("users:update")))
		.delete(users::delete_user.layer(guard("users:delete")));
	let user_roles: MethodRouter<ApiState> = get(users::get_user_roles.layer(guard("users:read")))
		.put(users::set_user_roles.layer(guard("users:update")));

	Router::new()
		.route("/roles", roles)
		.route("/roles/{id}", role)
		.route("/roles/{id}/permissions", role_permissions)
		.route("/roles/{id}/users", role_users)
		.route("/permissions", permissions)
		.route("/users", users)
		.route("/users/{id}", user)
		.route("/users/{id}/roles", user_roles)
		.with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
	use axum::{
		body::{to_bytes, Body},
		http::{header, Method, Request, StatusCode},
		response::Response,
		Router,
	};
	use serde::de::DeserializeOwned;
	use signage_server_rbac::{MemoryStore, NewUser, RbacServices, Stores, User};
	use tower::ServiceExt;

	use super::{rbac_router, ApiState};
	use crate::permission_middleware::AuthSubject;

	pub struct TestApp {
		pub router: Router,
		pub rbac: RbacServices,
		pub admin: User,
	}

	/// Router over a memory store with a seeded super admin user.
	pub async fn test_app() -> TestApp {
		let rbac = RbacServices::new(Stores::from_shared(MemoryStore::new()));
		let admin = rbac
			.users
			.create(NewUser {
				email: "admin@example.com".to_string(),
				name: "Admin".to_string(),
				is_active: None,
			})
			.await
			.unwrap();
		rbac.seeder.seed_standard_permissions().await.unwrap();
		rbac.seeder.seed_super_admin_role().await.unwrap();
		rbac.seeder.assign_super_admin(&admin.email).await.unwrap();

		TestApp {
			router: rbac_router(ApiState::new(rbac.clone())),
			rbac,
			admin,
		}
	}

	impl TestApp {
		pub async fn send(
			&self,
			method: Method,
			uri: &str,
			subject: Option<&User>,
			body: Option<serde_json::Value>,
		) -> Response {
			let mut builder = Request::builder().method(method).uri(uri);
			if body.is_some() {
				builder = builder.header(header::CONTENT_TYPE, "application/json");
			}
			let body = match body {
				Some(json) => Body::from(json.to_string()),
				None => Body::empty(),
			};
			let mut req = builder.body(body).unwrap();
			if let Some(user) = subject {
				req.extensions_mut().insert(AuthSubject::for_user(&user.id));
			}
			self.router.clone().oneshot(req).await.unwrap()
		}

		/// Send `raw` verbatim as a JSON body.
		pub async fn send_raw(
			&self,
			method: Method,
			uri: &str,
			subject: Option<&User>,
			raw: &str,
		) -> Response {
			let mut req = Request::builder()
				.method(method)
				.uri(uri)
				.header(header::CONTENT_TYPE, "application/json")
				.body(Body::from(raw.to_string()))
				.unwrap();
			if let Some(user) = subject {
				req.extensions_mut().insert(AuthSubject::for_user(&user.id));
			}
			self.router.clone().oneshot(req).await.unwrap()
		}

		pub async fn as_admin(
			&self,
			method: Method,
			uri: &str,
			body: Option<serde_json::Value>,
		) -> Response {
			self.send(method, uri, Some(&self.admin), body).await
		}
	}

	pub async fn json<T: DeserializeOwned>(resp: Response) -> T {
		let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
		serde_json::from_slice(&bytes).unwrap()
	}

	pub fn assert_status(resp: &Response, status: StatusCode) {
		assert_eq!(resp.status(), status);
	}
}

#[cfg(test)]
mod tests {
	use super::test_support::*;
	use axum::http::{Method, StatusCode};
	use signage_server_rbac::NewUser;

	#[tokio::test]
	async fn unauthenticated_requests_are_rejected() {
		let app = test_app().await;
		let resp = app.send(Method::GET, "/roles", None, None).await;
		assert_status(&resp, StatusCode::UNAUTHORIZED);
	}

	#[tokio::test]
	async fn users_without_roles_are_forbidden() {
		let app = test_app().await;
		let nobody = app
			.rbac
			.users
			.create(NewUser {
				email: "nobody@example.com".to_string(),
				name: "Nobody".to_string(),
				is_active: None,
			})
			.await
			.unwrap();

		for uri in ["/roles", "/permissions", "/users"] {
			let resp = app.send(Method::GET, uri, Some(&nobody), None).await;
			assert_status(&resp, StatusCode::FORBIDDEN);
		}
	}

	#[tokio::test]
	async fn read_permission_does_not_grant_writes() {
		let app = test_app().await;
		let reader = app
			.rbac
			.users
			.create(NewUser {
				email: "reader@example.com".to_string(),
				name: "Reader".to_string(),
				is_active: None,
			})
			.await
			.unwrap();
		let role = app
			.rbac
			.roles
			.create(signage_server_rbac::NewRole::named("Role Reader"))
			.await
			.unwrap();
		let read = app
			.rbac
			.permissions
			.list()
			.await
			.unwrap()
			.into_iter()
			.find(|p| p.is_pair("roles", "read"))
			.unwrap();
		app
			.rbac
			.roles
			.set_role_permissions(&role.id, &[read.id])
			.await
			.unwrap();
		app
			.rbac
			.users
			.set_user_roles(&reader.id, &[role.id])
			.await
			.unwrap();

		let resp = app.send(Method::GET, "/roles", Some(&reader), None).await;
		assert_status(&resp, StatusCode::OK);

		let resp = app
			.send(
				Method::POST,
				"/roles",
				Some(&reader),
				Some(serde_json::json!({ "name": "Sneaky" })),
			)
			.await;
		assert_status(&resp, StatusCode::FORBIDDEN);
	}
}
