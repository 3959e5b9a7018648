//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed by
//! [`CommandDispatcher`]. `build` and `plan` share their setup through
//! [`prepare`].

pub mod build;
pub mod completions;
pub mod dispatcher;
pub mod plan;
pub mod prepare;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
