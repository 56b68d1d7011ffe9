pub mod types;
pub mod keys;
pub mod config;
pub mod error;

pub use types::*;
pub use keys::*;
pub use config::Config;
pub use error::PulseboardError;
