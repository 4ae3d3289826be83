pub mod api;
pub mod config;
pub mod error;
pub mod mail;
pub mod models;
pub mod relay;
pub mod state;
pub mod transcode;
pub mod validation;

pub use config::Config;
pub use error::{RelayError, Result};
pub use relay::Relay;
pub use state::AppState;
