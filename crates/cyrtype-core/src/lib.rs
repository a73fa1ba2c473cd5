//! Shared foundations for cyrtype: the error type, configuration and the
//! key event vocabulary spoken between the event source and the engine.

pub mod config;
pub mod error;
pub mod types;

pub use config::CyrtypeConfig;
pub use error::{CyrtypeError, Result};
pub use types::*;
