//! Configuration module for resumotube
//!
//! Holds the provider credentials, persisted as a TOML file.

mod settings;

pub use settings::{Credentials, Settings};
