pub mod contest;
pub mod leaderboard;
pub mod payment;
pub mod shared;
pub mod submission;
pub mod user;
