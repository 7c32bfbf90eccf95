use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CAST_WIDTH, ENV_CONFIG, ENV_DEFAULT_PAGE_SIZE, ENV_MAX_FILTER_BYTES, ENV_MAX_FILTER_DEPTH,
    ENV_MAX_PAGE_SIZE,
};

#[derive(Parser)]
#[command(name = "filterkit")]
#[command(
    version,
    about = "Compile JSON filters to SQL and assemble keyset-paginated queries",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Largest filter JSON accepted, in bytes
    #[arg(long, global = true, env = ENV_MAX_FILTER_BYTES)]
    pub max_filter_bytes: Option<usize>,

    /// Deepest filter nesting accepted
    #[arg(long, global = true, env = ENV_MAX_FILTER_DEPTH)]
    pub max_filter_depth: Option<usize>,

    /// Width of the CHAR cast applied to the unique id
    #[arg(long, global = true, env = ENV_CAST_WIDTH)]
    pub cast_width: Option<u16>,

    /// Page size used when --page-size is not given
    #[arg(long, global = true, env = ENV_DEFAULT_PAGE_SIZE)]
    pub default_page_size: Option<u64>,

    /// Largest page size accepted
    #[arg(long, global = true, env = ENV_MAX_PAGE_SIZE)]
    pub max_page_size: Option<u64>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Compile a JSON filter to a SQL fragment and its arguments
    Compile {
        /// Filter JSON, e.g. '{"field":"age","op":">","value":30}'
        #[arg(long, short = 'f')]
        filter: String,
    },
    /// Assemble a keyset-paginated SELECT
    Page {
        /// Table to select from
        #[arg(long, short = 't')]
        table: String,

        /// Unique id column used for ordering and cursors [default: id]
        #[arg(long, short = 'u')]
        unique_id: Option<String>,

        /// Attribute descriptors JSON array; its unique id is used when
        /// --unique-id is not given
        #[arg(long, short = 'a', conflicts_with = "unique_id")]
        attributes: Option<String>,

        /// Optional filter JSON
        #[arg(long, short = 'f')]
        filter: Option<String>,

        /// str_id of the last row of the previous page
        #[arg(long)]
        cursor: Option<String>,

        /// Rows per page (0 = no limit)
        #[arg(long, short = 'n')]
        page_size: Option<u64>,
    },
    /// Decode a raw result row against attribute descriptors
    Decode {
        /// Attribute descriptors JSON array
        #[arg(long, short = 'a')]
        attributes: String,

        /// Row JSON object: column -> string cell or null
        #[arg(long, short = 'r')]
        row: String,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub max_filter_bytes: Option<usize>,
    pub max_filter_depth: Option<usize>,
    pub cast_width: Option<u16>,
    pub default_page_size: Option<u64>,
    pub max_page_size: Option<u64>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        max_filter_bytes: cli.max_filter_bytes,
        max_filter_depth: cli.max_filter_depth,
        cast_width: cli.cast_width,
        default_page_size: cli.default_page_size,
        max_page_size: cli.max_page_size,
    };
    (config, cli.command)
}
