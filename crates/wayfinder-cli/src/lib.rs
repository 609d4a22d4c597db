//! Wayfinder CLI library.
//!
//! Output formatting shared by the `wayfinder-cli` subcommands.

pub mod output;
