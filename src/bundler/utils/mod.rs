//! Shared helpers for filesystem and subprocess work.

pub mod fs;
pub mod process;
