pub mod achievements;
pub mod actions;
pub mod analytics;
pub mod leaderboard;
pub mod points;
pub mod users;
