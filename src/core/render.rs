//! Renderer module
//!
//! Renders ResultSet to different output formats: text, jsonl, json, md

use crate::core::model::{Kind, ResultItem, ResultSet};
use std::io::Write;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a new render config with default options
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    #[allow(dead_code)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Text => self.render_text(result_set),
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
        }
    }

    /// Render to a writer, terminated by a newline.
    ///
    /// An empty set writes nothing, except in `json` where it is still `[]`.
    pub fn render_to<W: Write>(&self, result_set: &ResultSet, mut writer: W) -> std::io::Result<()> {
        if result_set.is_empty() && self.config.format != OutputFormat::Json {
            return Ok(());
        }
        let output = self.render(result_set);
        writeln!(writer, "{}", output)
    }

    /// Render as plain text: one excerpt per item
    fn render_text(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| item.excerpt.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        // Group by kind
        let mut counts = Vec::new();
        let mut records = Vec::new();
        let mut cells = Vec::new();
        let mut sheets = Vec::new();
        let mut errors = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Count => counts.push(item),
                Kind::Record => records.push(item),
                Kind::Cell => cells.push(item),
                Kind::Sheet => sheets.push(item),
                Kind::Error => errors.push(item),
            }
        }

        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}\n", error.code, error.message));
                }
            }
            output.push('\n');
        }

        if !counts.is_empty() {
            output.push_str("## Counts\n\n");
            for item in counts {
                let path = item.path.as_deref().unwrap_or("-");
                let excerpt = item.excerpt.as_deref().unwrap_or_default();
                output.push_str(&format!("- `{}`: {}", path, excerpt));
                if item.meta.lossy {
                    output.push_str(" (lossy UTF-8)");
                }
                output.push('\n');
            }
            output.push('\n');
        }

        if !records.is_empty() {
            output.push_str("## Records\n\n");
            for item in records {
                let marker = match item.meta.matched {
                    Some(true) => "[x]",
                    Some(false) => "[ ]",
                    None => "-",
                };
                let excerpt = item.excerpt.as_deref().unwrap_or_default();
                output.push_str(&format!("- {} `{}`\n", marker, excerpt));
            }
            output.push('\n');
        }

        if !cells.is_empty() {
            output.push_str("## Cells\n\n");
            for item in cells {
                self.render_block_md(&mut output, item);
            }
        }

        if !sheets.is_empty() {
            output.push_str("## Sheet\n\n");
            for item in sheets {
                self.render_block_md(&mut output, item);
            }
        }

        output
    }

    fn render_block_md(&self, output: &mut String, item: &ResultItem) {
        if let Some(excerpt) = &item.excerpt {
            output.push_str("```\n");
            output.push_str(excerpt);
            if !excerpt.ends_with('\n') {
                output.push('\n');
            }
            output.push_str("```\n\n");
        }
    }
}
