//! Command-line support for the `usm-key` tool.
//!
//! Enabled by the `cli` feature.

pub mod args;
pub mod command;
