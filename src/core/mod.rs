//! Core module - Shared data structures and utilities
//!
//! This module provides:
//! - Unified result model (ResultItem)
//! - Rendering functions for different output formats
//! - Path resolution utilities
//! - Text loading (stdin/files, strict or lossy UTF-8)
//! - Diagnostics on stderr

pub mod diag;
pub mod file_reader;
pub mod model;
pub mod paths;
pub mod render;
