//! Library half of the `medrec` binary: logging setup and configuration
//! loading.

pub mod config;
pub mod logging;
