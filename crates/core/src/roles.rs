//! Well-known role name constants.
//!
//! These must match the values accepted by the `student_profiles.role` check
//! constraint and the `role` claim issued by the auth provider.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STUDENT: &str = "student";
