//! Wrappers around the external command-line tools the build drives.

pub mod esbuild;
pub mod npm;

pub use esbuild::SubprocessEsbuild;
