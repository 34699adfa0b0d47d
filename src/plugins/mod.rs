//! Command surfaces, one module per top-level subcommand.

pub mod admin;
pub mod config_cli;
pub mod dispute;
pub mod propose;
pub mod query;
pub mod request;
pub mod research;
pub mod vote;
