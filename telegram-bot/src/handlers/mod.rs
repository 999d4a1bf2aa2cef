//! Framework handlers: logging and chat allow-list.

mod allow_list;
mod logging;

pub use allow_list::AllowListHandler;
pub use logging::LoggingHandler;
