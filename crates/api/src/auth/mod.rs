//! Authentication primitives.
//!
//! - [`jwt`] -- validation of provider-issued HS256 access tokens.

pub mod jwt;
