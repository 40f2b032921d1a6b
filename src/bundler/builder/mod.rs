//! Bundle orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that drives the
//! external packaging tools to produce a disk image.
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum of the finished image
//! - [`orchestrator`] - Main [`Bundler`] struct and the pipeline
//! - [`scratch`] - Scratch directory removed on drop
//! - [`toolchain`] - External tool resolution

mod checksum;
mod orchestrator;
mod scratch;
mod toolchain;

pub use checksum::calculate_sha256;
pub use orchestrator::{BundledArtifact, Bundler};
pub use scratch::ScratchDir;
pub use toolchain::{DEFAULT_TOOL_DIR, Tool, Toolchain};
