//! Process-level runtime support for the chirp server: layered
//! configuration, logging bootstrap and home-directory resolution.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{
    AppConfig, AuthConfig, BootstrapAdmin, CliArgs, DatabaseConfig, LoggingConfig, SectionConfig,
    ServerConfig,
};
