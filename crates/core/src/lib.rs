//! StudyHub gamification core.
//!
//! Pure domain logic for points, progress, achievements, leaderboards and
//! analytics. Nothing in this crate performs I/O: every function is derived
//! from the action ledger handed to it plus the static rule tables.
//!
//! Dependency order (leaves first):
//!
//! - [`points`] -- classifies an action into a point award and category.
//! - [`progress`] -- folds a user's ledger into [`progress::UserProgress`].
//! - [`achievements`] -- evaluates the catalog against progress.
//! - [`leaderboard`] -- ranks users within a scope and timeframe.
//! - [`analytics`] -- population-wide rollups.

pub mod achievements;
pub mod actions;
pub mod analytics;
pub mod error;
pub mod leaderboard;
pub mod points;
pub mod progress;
pub mod roles;
pub mod timeframe;
pub mod types;
