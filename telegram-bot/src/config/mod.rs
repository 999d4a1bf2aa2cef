//! Bot configuration shared by every bot built on this framework.

mod base;


pub use base::{BaseConfig, DEFAULT_LOG_FILE};
