//! Storage is organized through [snapshot_storage::FileSnapshotStore].
//! The basic idea is:
//!   - Three plain text artifacts hold the total, the per-minute counts and the per-key counts.
//!   - Each artifact is rewritten in full after every change, atomically.
//!   - An artifact only counts as today's data if its modification time falls on today.

pub mod entities;
pub mod key_event;
pub mod snapshot_storage;
