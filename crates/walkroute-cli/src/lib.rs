//! Walkroute CLI library.
//!
//! Argument parsing helpers and output formatting shared by the
//! `walkroute-cli` binary.

pub mod args;
pub mod output;
