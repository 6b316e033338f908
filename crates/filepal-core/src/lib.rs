pub mod config;
pub mod error;
pub mod format;
pub mod types;

pub use config::FilepalConfig;
pub use error::{FilepalError, Result};
pub use types::*;
