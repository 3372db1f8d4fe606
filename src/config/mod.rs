//! StackCodeSy configuration module
//! Handles the provider settings and the optional config file

pub mod config;

pub use config::{AuthConfig, AuthSettings, Config};
