//! Interactive n-gram frequency explorer.
//!
//! Reads a text file once, then lets the user repeatedly pick a pattern length
//! and filters, prints and charts the most frequent patterns, and optionally
//! saves the full frequency table to a dated text file.

pub mod chart;
pub mod cli;
pub mod corpus;
pub mod error;
pub mod patterns;
pub mod report;
pub mod session;

pub use error::{DetectorError, ParamError, Result};
