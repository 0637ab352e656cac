//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated user, from a JWT Bearer token.
//! - [`rbac`] -- one extractor per gated action, each wrapping `AuthUser`.

pub mod auth;
pub mod rbac;
