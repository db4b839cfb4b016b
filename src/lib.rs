//! chronomind - Weekly journal summarizer
//!
//! A command-line journal that stores free-text daily entries, groups them by
//! ISO calendar week and asks a pretrained summarization model for a short
//! summary of every week.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;

pub use error::ChronoError;

#[cfg(test)]
mod test_support;
