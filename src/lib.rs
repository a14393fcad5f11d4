//! pomlens - cached Maven dependency insight
//!
//! Parses the output of Maven's dependency goals into structured data and
//! caches the results per project descriptor across an in-process tier,
//! a small persistent document and a blob directory.

pub mod cache;
pub mod cli;
pub mod config;
pub mod deps;
pub mod error;
pub mod maven;
pub mod service;
pub mod ui;

pub use error::{PomlensError, PomlensResult};
