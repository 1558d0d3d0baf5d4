//! Core worktree operations.
//!
//! Each submodule contains the business logic behind a command, separated
//! from argument parsing and output rendering. Functions accept structured
//! params, a [`RepoGateway`](crate::git::RepoGateway) and a
//! [`ProgressSink`](crate::core::ProgressSink), and return structured results.

pub mod create;
pub mod paths;
pub mod promote;
pub mod registry;
pub mod remove;
pub mod synth;

pub use registry::{Registry, WorktreeDescriptor, WorktreeKind};
pub use synth::CheckoutOptions;
