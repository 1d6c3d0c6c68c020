// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use signage_server_rbac::UserId;

/// Signage server RBAC administration.
#[derive(Parser, Debug)]
#[command(
	name = "signage-server",
	about = "Signage server RBAC administration",
	version
)]
pub struct Args {
	/// Config file, overriding /etc/signage/server.toml
	#[arg(long, global = true, env = "SIGNAGE_SERVER_CONFIG")]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
	/// Apply the database schema
	Migrate,

	/// Insert the standard resource/action permission catalog
	SeedPermissions,

	/// Create the Super Admin role and the *:manage permission
	SeedSuperAdmin,

	/// Make a user Super Admin, replacing their other roles
	AssignSuperAdmin {
		/// Defaults to `seed.super_admin_email` from config
		#[arg(long)]
		email: Option<String>,
	},

	/// Check whether a user holds a permission
	Check {
		#[arg(long)]
		user: UserId,

		/// Permission as `resource:action`
		#[arg(long)]
		permission: String,
	},

	/// Show version information
	Version,
}
