//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Reads take
//! `&PgPool`; writes that participate in the award transaction take
//! `&mut PgConnection` so they can run inside `pool.begin()`.

pub mod achievement_repo;
pub mod action_repo;
pub mod award_repo;
pub mod leaderboard_repo;
pub mod notification_repo;
pub mod profile_repo;
pub mod user_points_repo;

pub use achievement_repo::AchievementRepo;
pub use action_repo::ActionRepo;
pub use award_repo::AwardRepo;
pub use leaderboard_repo::LeaderboardRepo;
pub use notification_repo::NotificationRepo;
pub use profile_repo::ProfileRepo;
pub use user_points_repo::UserPointsRepo;
