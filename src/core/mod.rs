//! Application wiring

pub(crate) mod mutex_ext;
pub mod state;

pub use state::AppState;
