pub mod decoder;
pub mod leaderboard;
pub mod ranking;
