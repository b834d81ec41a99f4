//! Counts keystrokes for the current day, keeps the counts on disk so a restart picks up where it
//! left off, and races the daily total against friends on a shared leaderboard.

pub mod cli;
pub mod config;
pub mod daemon;
pub mod fs;
pub mod key_source;
pub mod utils;
