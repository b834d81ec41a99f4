//! Text rendering for everything keyrace prints or logs.

pub mod charts;
pub mod label;
pub mod leaderboard;
