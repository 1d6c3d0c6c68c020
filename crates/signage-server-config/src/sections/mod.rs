// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections. Each has a resolved form and a partial layer.

mod database;
mod logging;
mod seed;

pub use database::{DatabaseConfig, DatabaseConfigLayer, DEFAULT_DATABASE_URL};
pub use logging::{LoggingConfig, LoggingConfigLayer, DEFAULT_LOG_LEVEL, LOG_LEVELS};
pub use seed::{SeedConfig, SeedConfigLayer, DEFAULT_SUPER_ADMIN_EMAIL};
