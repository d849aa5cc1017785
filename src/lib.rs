//! inkpost - A personal blog backend
//!
//! This library provides the core functionality for the inkpost service:
//! a public article feed with genres, search, likes and translation, plus an
//! OAuth-gated admin API for writing Markdown articles and uploading images.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line article maintenance
//!
//! # Architecture
//! - `storage`: SeaORM storage backend and data models
//! - `services`: Business logic (articles, feed, likes, translation, uploads, identity)
//! - `api`: HTTP services and middleware
//! - `interfaces`: Command-line interface
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Process-wide setup such as logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
