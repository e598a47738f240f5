//! # API Shared
//!
//! JSON wire types and shared services for the dxassist HTTP layer.
//!
//! Contains:
//! - Request/response bodies with OpenAPI schemas (`wire` module)
//! - `HealthService`
//!
//! Used by `api-rest`; kept apart so the wire format does not depend on axum.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
