// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Signage server RBAC administration binary.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use signage_server::{commands, logging, version, Args, Command};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
	dotenvy::dotenv().ok();
	let args = Args::parse();

	if args.command == Command::Version {
		println!("{}", version::format_version_info());
		return Ok(ExitCode::SUCCESS);
	}

	let config = match &args.config {
		Some(path) => signage_server_config::load_config_with_file(path),
		None => signage_server_config::load_config(),
	}
	.context("failed to load configuration")?;

	logging::init(&config.logging);
	tracing::info!(database = %config.database.url, command = ?args.command, "starting signage-server");

	let rbac = commands::connect(&config).await?;

	let output = match args.command {
		Command::Migrate => "migrations applied".to_string(),
		Command::SeedPermissions => commands::seed_permissions(&rbac).await?,
		Command::SeedSuperAdmin => commands::seed_super_admin(&rbac).await?,
		Command::AssignSuperAdmin { email } => {
			let email = email.unwrap_or_else(|| config.seed.super_admin_email.clone());
			commands::assign_super_admin(&rbac, &email).await?
		}
		Command::Check { user, permission } => {
			let (output, allowed) = commands::check(&rbac, &user, &permission).await?;
			println!("{output}");
			return Ok(if allowed {
				ExitCode::SUCCESS
			} else {
				ExitCode::FAILURE
			});
		}
		Command::Version => version::format_version_info(),
	};

	println!("{output}");
	Ok(ExitCode::SUCCESS)
}
