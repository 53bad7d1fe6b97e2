//! CLI library for testing purposes

pub mod report;

pub use report::{append_github_output, ci_output_line, status_line};
