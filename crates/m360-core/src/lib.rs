//! Domain layer for Monastery360.
//!
//! - [`chat`]: the rule-based guide bot, its session and structured replies
//! - [`viewer`]: choosing and driving a 360° video presentation
//! - [`knowledge`], [`routes`], [`config`]: the static data and settings both
//!   depend on

pub mod chat;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod routes;
pub mod viewer;

// Re-export common error type
pub use error::{M360Error, Result};
