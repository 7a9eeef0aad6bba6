//! Identity resolution - bearer tokens carrying the caller's organization.

mod jwt;

pub use jwt::{JwtConfig, JwtTokenService};
