//! User-facing interfaces besides the HTTP API

#[cfg(feature = "cli")]
pub mod cli;
