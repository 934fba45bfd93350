//! Configuration for the account switcher.
//!
//! Defaults, the optional `config.toml` and command line flags are merged into
//! one immutable [`Config`].

mod config;

pub use config::*;
