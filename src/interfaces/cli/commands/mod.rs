//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod article_management;
pub mod config_management;
mod migrate;

pub use article_management::*;
pub use migrate::migrate;
