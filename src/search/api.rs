//! Count API - `tilde count` and `tilde normalize`

use anyhow::{bail, Result};
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::core::diag::Reporter;
use crate::core::file_reader::{read_text, LoadError, ReadConfig};
use crate::core::model::{Meta, ResultItem, ResultSet, TildeError};
use crate::core::paths::{display_path, resolve};
use crate::core::render::{RenderConfig, Renderer};
use crate::search::kmp::Matcher;
use crate::search::normalize::normalize;

/// Outcome of counting one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCount {
    pub path: String,
    pub count: usize,
    /// Normalized haystack length in codepoints
    pub chars: usize,
    pub size: u64,
    pub lossy: bool,
}

/// An input that could not be loaded
#[derive(Debug)]
pub struct FailedInput {
    pub path: String,
    pub error: LoadError,
}

impl FailedInput {
    fn to_result_item(&self) -> ResultItem {
        ResultItem::error(TildeError::new(self.error.code(), self.error.to_string()))
            .with_path(self.path.clone())
    }
}

/// Human-readable summary line for a count
pub fn describe_count(count: usize) -> String {
    if count == 1 {
        "1 occurrence found".to_string()
    } else {
        format!("{} occurrences found", count)
    }
}

/// Count the (normalized) needle in one input
fn count_file(
    root: &Path,
    path: &Path,
    matcher: &Matcher,
    config: &ReadConfig,
) -> Result<FileCount, FailedInput> {
    let resolved = resolve(root, path);
    let loaded = read_text(&resolved, config).map_err(|error| FailedInput {
        path: display_path(root, &resolved),
        error,
    })?;

    let haystack: Vec<char> = normalize(&loaded.content).chars().collect();
    let count = matcher.count_in_chars(&haystack);

    Ok(FileCount {
        path: display_path(root, &resolved),
        count,
        chars: haystack.len(),
        size: loaded.size,
        lossy: loaded.lossy,
    })
}

/// Count `needle` in every file, keeping argument order.
///
/// One failure table is built for the needle and shared by all inputs. An
/// input that cannot be loaded yields its own `Err` without stopping the rest.
pub fn count_files(
    root: &Path,
    files: &[PathBuf],
    needle: &str,
    config: &ReadConfig,
) -> Vec<Result<FileCount, FailedInput>> {
    let matcher = Matcher::new(&normalize(needle));

    #[cfg(feature = "parallel")]
    let outcomes = {
        use rayon::prelude::*;
        files
            .par_iter()
            .map(|path| count_file(root, path, &matcher, config))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let outcomes = files
        .iter()
        .map(|path| count_file(root, path, &matcher, config))
        .collect();

    outcomes
}

fn to_result_item(needle: &str, normalized_needle: &str, file: FileCount) -> ResultItem {
    ResultItem::count(file.path, describe_count(file.count))
        .with_data(json!({
            "count": file.count,
            "needle": needle,
            "normalized_needle": normalized_needle,
            "chars": file.chars,
        }))
        .with_meta(Meta {
            size: Some(file.size),
            lossy: file.lossy,
            ..Default::default()
        })
}

/// Run the count command
pub fn run_count(
    root: &Path,
    files: &[PathBuf],
    needle: Option<&str>,
    lossy: bool,
    config: RenderConfig,
    reporter: &Reporter,
) -> Result<()> {
    let Some(needle) = needle else {
        bail!("No search text supplied (use --text or TILDE_SEARCH_TEXT)");
    };
    if files.is_empty() {
        bail!("No input file supplied (pass FILE or set TILDE_SEARCH_FILE)");
    }

    let read_config = if lossy {
        ReadConfig::lossy()
    } else {
        ReadConfig::default()
    };

    let normalized_needle = normalize(needle);
    reporter.debug(format!(
        "needle {:?} normalized to {:?} ({} chars)",
        needle,
        normalized_needle,
        normalized_needle.chars().count()
    ));
    if normalized_needle.is_empty() {
        reporter.warn("search text is empty after normalization; every count will be 0");
    }

    let mut result_set = ResultSet::new();
    let mut failures = Vec::new();
    for outcome in count_files(root, files, needle, &read_config) {
        match outcome {
            Ok(file) => {
                if file.lossy {
                    reporter.warn(format!("{}: invalid UTF-8 replaced", file.path));
                }
                reporter.debug(format!(
                    "{}: {} bytes, {} normalized chars, {} matches",
                    file.path, file.size, file.chars, file.count
                ));
                result_set.push(to_result_item(needle, &normalized_needle, file));
            }
            Err(failed) => {
                result_set.push(failed.to_result_item());
                failures.push(failed);
            }
        }
    }

    Renderer::with_config(config).render_to(&result_set, std::io::stdout().lock())?;

    let failed = failures.len();
    match failures.into_iter().next() {
        None => Ok(()),
        Some(first) => Err(anyhow::Error::new(first.error).context(format!(
            "{} of {} inputs could not be loaded (first: {})",
            failed,
            files.len(),
            first.path
        ))),
    }
}

/// Run the normalize command
pub fn run_normalize(text: &str, config: RenderConfig) -> Result<()> {
    let normalized = normalize(text);

    let mut result_set = ResultSet::new();
    result_set.push(
        ResultItem::cell(normalized.clone()).with_data(json!({
            "input": text,
            "normalized": normalized,
        })),
    );

    Renderer::with_config(config).render_to(&result_set, std::io::stdout().lock())?;
    Ok(())
}
