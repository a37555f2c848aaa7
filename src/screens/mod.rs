//! Non-game tabs: word practice, read-along and profiles.

pub mod practice;
pub mod profile;
pub mod read;
