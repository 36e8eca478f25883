//! The directed follow graph between users.
//!
//! Owns the `relationships` table: one row per follower → followed edge,
//! unique per pair. Exposes follow/unfollow plus the follower and
//! following listings; the feed query consumes [`contract::client`] to
//! learn who a user follows.

pub mod api;
pub mod contract;
pub mod domain;
pub mod gateways;
pub mod infra;

pub use infra::storage::migrations::Migrator;
