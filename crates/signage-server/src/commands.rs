// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Command implementations.
//!
//! Each command works on [`RbacServices`] and returns the text to print, so
//! the same code runs against SQLite in the binary and an in-memory store in
//! tests.

use anyhow::{Context, Result};
use signage_server_config::ServerConfig;
use signage_server_db::{create_pool, rbac_stores, run_migrations};
use signage_server_rbac::{RbacServices, UserId};

/// Open the configured database, apply the schema and build the services.
pub async fn connect(config: &ServerConfig) -> Result<RbacServices> {
	let pool = create_pool(&config.database.url)
		.await
		.with_context(|| format!("failed to open database {}", config.database.url))?;
	run_migrations(&pool)
		.await
		.context("failed to apply database migrations")?;
	Ok(RbacServices::new(rbac_stores(pool)))
}

pub async fn seed_permissions(rbac: &RbacServices) -> Result<String> {
	let report = rbac
		.seeder
		.seed_standard_permissions()
		.await
		.context("failed to seed standard permissions")?;
	tracing::info!(created = report.created, "seeded standard permissions");
	Ok(format!("created {} permissions", report.created))
}

pub async fn seed_super_admin(rbac: &RbacServices) -> Result<String> {
	let report = rbac
		.seeder
		.seed_super_admin_role()
		.await
		.context("failed to seed super admin role")?;

	let status = |created: bool| if created { "created" } else { "exists" };
	Ok(format!(
		"role '{}' ({}): {}\npermission {}: {}\nassignment: {}",
		report.role.name,
		report.role.id,
		status(report.created.role),
		report.permission.permission(),
		status(report.created.permission),
		status(report.created.assignment),
	))
}

/// Replace `email`'s roles with exactly the Super Admin role.
pub async fn assign_super_admin(rbac: &RbacServices, email: &str) -> Result<String> {
	let user = rbac
		.seeder
		.assign_super_admin(email)
		.await
		.with_context(|| format!("failed to assign super admin to {email}"))?;
	Ok(format!("{} ({}) is now Super Admin", user.email, user.id))
}

/// Returns the decision as text and whether access was allowed.
pub async fn check(rbac: &RbacServices, user: &UserId, permission: &str) -> Result<(String, bool)> {
	let allowed = rbac
		.authorizer
		.check_permission(user, permission)
		.await
		.with_context(|| format!("failed to check {permission} for {user}"))?;
	let decision = if allowed { "allow" } else { "deny" };
	Ok((format!("{decision}: {user} {permission}"), allowed))
}

#[cfg(test)]
mod tests {
	use super::*;
	use signage_server_rbac::{MemoryStore, NewRole, NewUser, Stores, SUPER_ADMIN_ROLE_NAME};

	fn services() -> RbacServices {
		RbacServices::new(Stores::from_shared(MemoryStore::new()))
	}

	async fn user(rbac: &RbacServices, email: &str) -> signage_server_rbac::User {
		rbac
			.users
			.create(NewUser {
				email: email.to_string(),
				name: "Operator".to_string(),
				is_active: None,
			})
			.await
			.unwrap()
	}

	#[tokio::test]
	async fn seed_commands_report_idempotently() {
		let rbac = services();

		let first = seed_permissions(&rbac).await.unwrap();
		assert_eq!(first, "created 24 permissions");
		assert_eq!(seed_permissions(&rbac).await.unwrap(), "created 0 permissions");

		let first = seed_super_admin(&rbac).await.unwrap();
		assert!(first.contains("role 'Super Admin'"));
		assert!(first.contains("*:manage: created"));
		let second = seed_super_admin(&rbac).await.unwrap();
		assert!(second.contains("*:manage: exists"));
		assert!(second.contains("assignment: exists"));
	}

	#[tokio::test]
	async fn assign_super_admin_replaces_roles() {
		let rbac = services();
		let operator = user(&rbac, "ops@example.com").await;
		let other = rbac.roles.create(NewRole::named("Viewer")).await.unwrap();
		rbac.users.set_user_roles(&operator.id, &[other.id]).await.unwrap();

		seed_super_admin(&rbac).await.unwrap();
		let out = assign_super_admin(&rbac, "ops@example.com").await.unwrap();
		assert!(out.contains("ops@example.com"));

		let roles = rbac.users.get_user_roles(&operator.id).await.unwrap();
		assert_eq!(roles.len(), 1);
		assert_eq!(roles[0].name, SUPER_ADMIN_ROLE_NAME);

		let (text, allowed) = check(&rbac, &operator.id, "devices:delete").await.unwrap();
		assert!(allowed);
		assert!(text.starts_with("allow"));
	}

	#[tokio::test]
	async fn assign_super_admin_without_seed_fails() {
		let rbac = services();
		user(&rbac, "ops@example.com").await;

		let err = assign_super_admin(&rbac, "ops@example.com").await.unwrap_err();
		assert!(format!("{err:#}").contains("seed-super-admin"));

		let err = assign_super_admin(&rbac, "missing@example.com")
			.await
			.unwrap_err();
		assert!(format!("{err:#}").contains("missing@example.com"));
	}

	#[tokio::test]
	async fn check_denies_and_rejects_malformed_permission() {
		let rbac = services();
		let nobody = user(&rbac, "nobody@example.com").await;

		let (text, allowed) = check(&rbac, &nobody.id, "content:read").await.unwrap();
		assert!(!allowed);
		assert!(text.starts_with("deny"));

		assert!(check(&rbac, &nobody.id, "content").await.is_err());
	}
}
