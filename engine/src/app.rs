//! Core application

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::cli::{self, Commands};
use crate::core::config::EngineConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::data::decode::{RawRow, decode_row};
use crate::data::filters::{compile, parse_condition_with_limits, parse_optional_condition};
use crate::data::query::KeysetQuery;
use crate::data::types::AttributeDescriptor;

const DEFAULT_UNIQUE_ID: &str = "id";

pub struct CoreApp {
    pub config: EngineConfig,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self {
            config: EngineConfig::load(&cli_config)?,
        };
        app.execute(command)
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        // stdout carries command output, so logs go to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    fn execute(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Compile { filter } => {
                let condition = parse_condition_with_limits(
                    &filter,
                    self.config.max_filter_bytes,
                    self.config.max_filter_depth,
                )
                .context("Invalid filter")?;
                let query = compile(&condition).context("Failed to compile filter")?;
                print_json(&query)
            }
            Commands::Page {
                table,
                unique_id,
                attributes,
                filter,
                cursor,
                page_size,
            } => {
                let unique_id = match (unique_id, attributes) {
                    (Some(unique_id), _) => unique_id,
                    (None, Some(attributes)) => {
                        let attributes = parse_attributes(&attributes)?;
                        AttributeDescriptor::find_unique_id(&attributes)?
                            .external_id
                            .clone()
                    }
                    (None, None) => DEFAULT_UNIQUE_ID.to_string(),
                };
                let filter = match filter {
                    Some(json) => parse_optional_condition(
                        &json,
                        self.config.max_filter_bytes,
                        self.config.max_filter_depth,
                    )
                    .context("Invalid filter")?,
                    None => None,
                };
                let page_size = page_size.unwrap_or(self.config.default_page_size);

                tracing::debug!(
                    table = %table,
                    unique_id = %unique_id,
                    page_size,
                    "Assembling page query"
                );

                let query = KeysetQuery::new(table, unique_id)
                    .with_filter(filter)
                    .with_cursor(cursor)
                    .page_size(page_size)
                    .with_config(&self.config)
                    .assemble()
                    .context("Failed to assemble page query")?;
                print_json(&query)
            }
            Commands::Decode { attributes, row } => {
                let attributes = parse_attributes(&attributes)?;
                let row = parse_row(&row)?;
                let object = decode_row(&row, &attributes).context("Failed to decode row")?;
                print_json(&object)
            }
        }
    }
}

fn parse_attributes(json: &str) -> Result<Vec<AttributeDescriptor>> {
    serde_json::from_str(json).context("Failed to parse attribute descriptors")
}

/// Rows arrive as `{"column": "text" | null}`; cells become their UTF-8 bytes
fn parse_row(json: &str) -> Result<RawRow> {
    let cells: BTreeMap<String, Option<String>> =
        serde_json::from_str(json).context("Failed to parse row")?;
    Ok(cells
        .into_iter()
        .map(|(column, cell)| (column, cell.map(String::into_bytes)))
        .collect())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", output);
    Ok(())
}
