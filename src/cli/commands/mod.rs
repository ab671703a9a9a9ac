//! Subcommands of the `tdgrid` binary

pub mod train;
