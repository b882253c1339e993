//! Presentation adapters for dashboard responses.
//!
//! # Submodules
//!
//! - [`segment`]: splits summary text into headings, bullet lists, and paragraphs
//! - [`markdown`]: renders a full response as a Markdown report
//! - [`json`]: writes response snapshots to date-named directories

pub mod json;
pub mod markdown;
pub mod segment;
