// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP surface for signage RBAC.
//!
//! [`RequirePermission`] guards individual handlers, and [`rbac_router`]
//! mounts the role, permission and user admin endpoints behind it. Token
//! verification is expected upstream; it must insert an [`AuthSubject`] into
//! the request extensions.

pub mod api_response;
pub mod permission_middleware;
pub mod routes;

pub use api_response::{ApiError, ErrorResponse};
pub use permission_middleware::{AuthSubject, RequirePermission, RequirePermissionService};
pub use routes::{rbac_router, ApiState};
