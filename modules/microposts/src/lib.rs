//! Microposts and the home feed.
//!
//! Owns the `microposts` table. The feed is the reverse-chronological
//! union of a user's own posts and the posts of everyone they follow,
//! resolved through the relationships contract client.

pub mod api;
pub mod contract;
pub mod domain;
pub mod infra;

pub use infra::storage::migrations::Migrator;
