//! Shared runtime pieces: errors, config, local state layout, the realm
//! executor and console/log output.

pub mod config;
pub mod contract_error;
pub mod error;
pub mod executor;
pub mod logging;
pub mod output;
pub mod store;
pub mod time;
