//! Search module - Accent-insensitive phrase counting
//!
//! Provides:
//! - normalize: lowercase + NFD + nonspacing-mark removal
//! - kmp: linear-time overlapping occurrence counting
//! - api: the `count` and `normalize` commands

pub mod api;
pub mod kmp;
pub mod normalize;
