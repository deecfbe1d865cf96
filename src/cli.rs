use clap::{Parser, Subcommand};
use reelshelf_common::MediaKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reelshelf")]
#[command(author, version, about = "Catalog a local movie/series collection")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse filenames and show the extracted metadata
    Parse {
        /// Filenames to parse
        #[arg(required = true)]
        filenames: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scan a library and group it into movies and series
    Scan {
        /// Library root (defaults to library.root from the config)
        root: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Resolve poster artwork for every title
        #[arg(long)]
        posters: bool,
    },

    /// Search the library for a title by name
    Find {
        /// Name to look for
        name: String,

        /// Kind of media to search
        #[arg(short, long, default_value = "movie")]
        kind: MediaKind,

        /// Library root (defaults to library.root from the config)
        root: Option<PathBuf>,
    },

    /// Look up and cache the poster for a single title
    Poster {
        /// Title to look up
        title: String,

        /// Kind of media
        #[arg(short, long, default_value = "movie")]
        kind: MediaKind,

        /// Release year
        #[arg(short, long)]
        year: Option<String>,

        /// Region / country code
        #[arg(short, long)]
        region: Option<String>,
    },

    /// Manage the local poster cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// List cached poster keys
    List,
    /// Delete every cached poster
    Clear,
}
