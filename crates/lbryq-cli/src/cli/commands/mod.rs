//! CLI command handlers, one file per command.

mod classify;
mod completions;
mod preview;
mod search;

pub use classify::run_classify;
pub use completions::{run_completions, run_man};
pub use preview::run_preview;
pub use search::{run_search, SearchArgs};
