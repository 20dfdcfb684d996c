//! Authentication and authorization extractors.
//!
//! - [`auth::AuthMember`] -- Any valid Bearer token, member row optional.
//! - [`rbac::SignedUpMember`] -- An active member who completed sign-up.
//! - [`rbac::RequireAdmin`] -- A signed-up member with the `ADMIN` role.

pub mod auth;
pub mod rbac;
