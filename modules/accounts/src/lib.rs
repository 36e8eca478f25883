//! User accounts and the session/auth manager.
//!
//! Owns the `users` table, the signup/profile lifecycle, credential
//! authentication and the signed remember-token cookie that recalls a
//! returning browser. Other modules consume the [`contract`] layer only.

pub mod api;
pub mod contract;
pub mod domain;
pub mod gateways;
pub mod infra;

pub use infra::storage::migrations::Migrator;
