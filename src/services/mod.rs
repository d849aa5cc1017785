//! Service layer for business logic
//!
//! This module provides unified business logic that can be shared between
//! different interfaces (HTTP API, CLI).

mod article_service;
pub mod feed;
pub mod identity;
mod like_service;
pub mod object_store;
pub mod translate;

pub use article_service::*;
pub use feed::{FeedPage, FeedQuery, GenreCount};
pub use identity::{IdentityProvider, IdentityUser, identity_from_config};
pub use like_service::*;
pub use object_store::{LocalStore, ObjectStore, object_store_from_config};
pub use translate::{Translator, translator_from_config};
