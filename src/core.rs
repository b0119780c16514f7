pub mod acquire;
pub mod leaderboard;
pub mod modes;
pub mod score;
