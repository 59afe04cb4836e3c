//! `tidelink` command-line client.
//!
//! Thin front end over the `tidelink` driver crate: every subcommand builds a
//! [`Driver`](tidelink::Driver) from the resolved configuration, runs one
//! operation, and prints a JSON envelope on stdout. Logs go to stderr.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
