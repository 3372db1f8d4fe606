//! Repositories

pub mod secret;
