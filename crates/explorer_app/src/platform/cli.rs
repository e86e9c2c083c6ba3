use std::path::PathBuf;

use clap::Parser;

use super::config::{CatalogChoice, TruncateChoice};

/// Page through a public catalog, merging pages into one deduplicated list.
#[derive(Debug, Default, Parser)]
#[command(name = "catalog-explorer")]
#[command(version)]
pub struct Args {
    /// RON configuration file (defaults to ./explorer.ron when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Catalog to browse
    #[arg(long, value_enum)]
    pub catalog: Option<CatalogChoice>,

    /// Fetch each Pokémon's detail record (stats, sprite)
    #[arg(long)]
    pub details: bool,

    /// Items per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Override the catalog's API address
    #[arg(long)]
    pub base_url: Option<String>,

    /// How "less" trims the list
    #[arg(long, value_enum)]
    pub truncate: Option<TruncateChoice>,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Also log to the terminal, at debug level
    #[arg(short, long)]
    pub verbose: bool,
}
