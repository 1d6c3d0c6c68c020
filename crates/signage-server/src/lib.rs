// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Operator commands for the signage server RBAC database.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod version;

pub use cli::{Args, Command};
