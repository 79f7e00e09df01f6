//! `coffeedocket-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod role;
pub mod session;

pub use claims::{validate_claims, JwtClaims, TokenValidationError};
pub use role::Role;
pub use session::{Session, SessionError, SessionEvent, SessionState};
