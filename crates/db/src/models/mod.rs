//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus the input DTOs used for inserts and upserts.

pub mod achievement;
pub mod action_record;
pub mod leaderboard;
pub mod notification;
pub mod profile;
pub mod user_points;
