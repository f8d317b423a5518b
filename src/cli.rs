//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::diag::{Reporter, Verbosity};
use crate::core::paths::default_state_path;
use crate::core::render::{OutputFormat, RenderConfig};
use crate::records::sort::{SortOrder, DEFAULT_SORT_KEY};
use crate::sheet::api::SheetAction;

/// tilde - accent-insensitive phrase counting, record filtering and a toy spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "tilde")]
#[command(
    author,
    version,
    about,
    long_about = r#"tilde bundles three small tools behind one binary.

Every command prints its results in the selected format (default: text).

Output formats:
- text: human-readable lines
- jsonl: one JSON object per line (best for piping into other tools)
- json: a single JSON array
- md: Markdown

Examples:
    tilde count parrafo.txt --text "logística"
    tilde filter tasks.json --where "status==open" --where "priority>=2" --order desc
    tilde sheet insert --row 4 --col 1 --value 12
    tilde sheet preview
"#
)]
pub struct Cli {
    /// Base directory for relative paths.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Base directory for relative paths (defaults to the current directory).\n\n\
Input files, the sheet state file and paths shown in results are resolved\n\
relative to it."
    )]
    pub root: PathBuf,

    /// Output format (text/jsonl/json/md).
    #[arg(
        long,
        global = true,
        default_value = "text",
        value_name = "FORMAT",
        long_help = "Select the output format.\n\n\
Supported values:\n\
- text (default)\n\
- jsonl\n\
- json\n\
- md (markdown)\n\n\
Unknown values fall back to text."
    )]
    pub format: String,

    /// Disable colored diagnostics.
    #[arg(
        long,
        global = true,
        long_help = "Disable colored diagnostics on stderr. Results on stdout are never colored."
    )]
    pub no_color: bool,

    /// Quiet mode (no warnings).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (more diagnostics).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Print progress details (normalized needle, input sizes, state file\n\
activity) to stderr."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count occurrences of a phrase, ignoring case and accents.
    #[command(
        long_about = r#"Count every occurrence of TEXT in each FILE, overlapping occurrences
included. Both sides are lowercased and stripped of diacritics first, so
"LOGÍSTICA" matches "logistica".

Files must be UTF-8; use --lossy to replace invalid bytes instead of failing.
Pass - to read standard input.

Examples:
    tilde count parrafo.txt --text "logística"
    TILDE_SEARCH_TEXT=ñandú tilde count notes/*.txt
    cat parrafo.txt | tilde count - --text clave
"#
    )]
    Count {
        /// Files to search (relative to ROOT unless absolute; - for stdin).
        #[arg(value_name = "FILE", env = "TILDE_SEARCH_FILE", num_args = 0..)]
        files: Vec<PathBuf>,

        /// Phrase to count.
        #[arg(long, short = 't', value_name = "TEXT", env = "TILDE_SEARCH_TEXT")]
        text: Option<String>,

        /// Replace invalid UTF-8 instead of failing.
        #[arg(long)]
        lossy: bool,
    },

    /// Print the comparison form of a text (lowercase, no diacritics).
    Normalize {
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Filter JSON records and sort the matches by priority.
    #[command(
        long_about = r#"Read a JSON array of objects from FILE (- for stdin), keep records that
satisfy every --where predicate, sort them stably by --sort-key and print them
first, followed by the remaining records in their original order.

Predicates have the form <field><op><value> with op one of < <= > >= == !=.
The value is read as JSON when possible (2, true, null, "quoted text") and as a
plain string otherwise. A record without the field never matches.

Examples:
    tilde filter tasks.json --where "status==open" --order desc
    tilde filter tasks.json --where "priority>=2" --where "owner!=ana" --format jsonl
"#
    )]
    Filter {
        /// JSON file holding an array of records.
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Predicate every selected record must satisfy (repeatable).
        #[arg(long = "where", short = 'w', value_name = "PREDICATE")]
        filters: Vec<String>,

        /// Sort direction for matching records (asc/desc).
        #[arg(long, default_value = "asc", value_name = "ORDER")]
        order: String,

        /// Field used to sort matching records.
        #[arg(long, default_value = DEFAULT_SORT_KEY, value_name = "FIELD")]
        sort_key: String,
    },

    /// Work with a small spreadsheet persisted as JSON.
    #[command(
        long_about = "A sparse sheet of cells addressed by 1-based row and column.\n\n\
State lives in a JSON file (default: ROOT/sheet_state.json). When no state\n\
exists yet, the sheet starts with demo data.\n\n\
Examples:\n\
  tilde sheet preview\n\
  tilde sheet insert --row 4 --col 1 --value 12\n\
  tilde sheet row --row 1\n"
    )]
    Sheet {
        /// State file (relative to ROOT unless absolute).
        #[arg(long, global = true, value_name = "PATH", env = "TILDE_SHEET_STATE")]
        state: Option<PathBuf>,

        #[command(subcommand)]
        action: SheetCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SheetCommands {
    /// Insert a value into an empty cell.
    Insert {
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        row: u32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        col: u32,
        /// Integer, decimal or text.
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },

    /// Update the value of an existing cell.
    Update {
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        row: u32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        col: u32,
        /// Integer, decimal or text.
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },

    /// Check whether a cell holds a value.
    Has {
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        row: u32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        col: u32,
    },

    /// Show the whole sheet.
    Preview,

    /// List the values of a row and their numeric sum.
    Row {
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        row: u32,
    },

    /// List the values of a column and their numeric sum.
    Col {
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        col: u32,
    },

    /// Delete the saved state and start again from the demo data.
    Reset,
}

impl From<SheetCommands> for SheetAction {
    fn from(command: SheetCommands) -> Self {
        match command {
            SheetCommands::Insert { row, col, value } => SheetAction::Insert { row, col, value },
            SheetCommands::Update { row, col, value } => SheetAction::Update { row, col, value },
            SheetCommands::Has { row, col } => SheetAction::Has { row, col },
            SheetCommands::Preview => SheetAction::Preview,
            SheetCommands::Row { row } => SheetAction::Row { row },
            SheetCommands::Col { col } => SheetAction::Col { col },
            SheetCommands::Reset => SheetAction::Reset,
        }
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    // Parse output format
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);
    let reporter = Reporter::new(Verbosity::from_flags(cli.quiet, cli.verbose), !cli.no_color);

    // Get absolute root path
    let root = cli.root.canonicalize().unwrap_or(cli.root);

    match cli.command {
        Commands::Count { files, text, lossy } => crate::search::api::run_count(
            &root,
            &files,
            text.as_deref(),
            lossy,
            render_config,
            &reporter,
        ),

        Commands::Normalize { text } => crate::search::api::run_normalize(&text, render_config),

        Commands::Filter {
            input,
            filters,
            order,
            sort_key,
        } => {
            let order: SortOrder = order.parse().unwrap_or_default();
            crate::records::api::run_filter(
                &root,
                &input,
                &filters,
                &sort_key,
                order,
                render_config,
                &reporter,
            )
        }

        Commands::Sheet { state, action } => {
            let state_path = match state {
                Some(path) => crate::core::paths::resolve(&root, &path),
                None => default_state_path(&root),
            };
            crate::sheet::api::run_sheet(&state_path, action.into(), render_config, &reporter)
        }
    }
}
