//! Core configuration for a composition session
//!
//! Everything a [`Session`](crate::Session) needs to know up front lives in
//! [`config::SessionConfig`]; it can be written by hand in TOML or RON and
//! loaded through the [`Config`](crate::config::Config) trait.

pub mod config;
