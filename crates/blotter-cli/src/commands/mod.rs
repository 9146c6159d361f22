pub mod common;
pub mod completions;
pub mod config;
pub mod queue;
pub mod sync;
pub mod watch;
