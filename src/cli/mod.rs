//! CLI infrastructure for the tdgrid experiment runner
//!
//! This module provides the command-line interface for training agents on
//! the bundled grid environments and reporting what they learned.

pub mod commands;
pub mod output;
