//! Sync adapters.
//!
//! Batch jobs that import external content into chat rooms through the same
//! store-then-broadcast path as live chat. Items are posted one at a time;
//! items posted before a failure stay committed.

mod github;
mod report;

pub use github::{mirror_threads, role_for, sync_github, BOT_IDENTITIES, REVIEW_MARKER};
pub use report::{report_window, sync_coderabbit, sync_report, REPORT_AUTHOR};
