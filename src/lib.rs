//! StackCodeSy authentication provider: environment bootstrap, interactive
//! login and session lifecycle for a host editor

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
