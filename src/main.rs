mod cli;

use reelshelf::{
    catalog,
    config::{self, Config},
    images::{PosterCache, PosterStorage},
    metadata::{build_provider, PosterQuery},
    scanner::{Library, Scanner},
};
use reelshelf_common::MediaKind;
use reelshelf_parser::MediaDescriptor;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{CacheAction, Cli, Commands};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "reelshelf=trace,reelshelf_parser=trace,reelshelf_common=debug".to_string()
        } else {
            "reelshelf=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Parse { filenames, json } => parse_names(&filenames, json),
        Commands::Scan {
            root,
            json,
            posters,
        } => {
            let config = config::load_config_or_default(config_path)?;
            let root = library_root(root, &config)?;
            if posters {
                let rt = tokio::runtime::Runtime::new()?;
                rt.block_on(scan_with_posters(&root, &config, json))
            } else {
                let library = Scanner::from_config(&config.library).index(&root)?;
                print_library(&library, json)
            }
        }
        Commands::Find { name, kind, root } => {
            let config = config::load_config_or_default(config_path)?;
            let root = library_root(root, &config)?;
            find(&root, &config, &name, kind)
        }
        Commands::Poster {
            title,
            kind,
            year,
            region,
        } => {
            let config = config::load_config_or_default(config_path)?;
            let query = PosterQuery::new(title, kind)
                .with_year(year)
                .with_region(region);
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(poster(&config, &query))
        }
        Commands::Cache { action } => {
            let config = config::load_config_or_default(config_path)?;
            cache_command(&config, action)
        }
        Commands::Validate {
            config: validate_path,
        } => {
            let path = validate_path.or_else(|| cli.config.clone());
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("reelshelf {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn library_root(root: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    root.or_else(|| config.library.root.clone())
        .context("No library root given and library.root is not set in the config")
}

fn parse_names(filenames: &[String], json: bool) -> Result<()> {
    let descriptors: Vec<MediaDescriptor> = filenames
        .iter()
        .map(|name| reelshelf_parser::parse(name))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
        return Ok(());
    }

    for (name, d) in filenames.iter().zip(&descriptors) {
        println!("{}", name);
        println!("  Title: {}", d.title);
        println!("  Kind: {}", d.kind);
        if let Some(ref year) = d.year {
            println!("  Year: {}", year);
        }
        if let Some(label) = d.episode_label() {
            println!("  Episode: {}", label);
        }
    }

    Ok(())
}

async fn scan_with_posters(root: &Path, config: &Config, json: bool) -> Result<()> {
    let mut library = Scanner::from_config(&config.library).index(root)?;

    let provider = build_provider(&config.provider)?;
    if !provider.is_available() {
        tracing::warn!("Provider {} is not available, posters will be skipped", provider.name());
    }
    let cache = PosterCache::new(&config.cache, provider)?;
    let attached = catalog::attach_posters(&mut library, &cache).await;
    tracing::info!("Attached {} posters", attached);

    print_library(&library, json)
}

fn print_library(library: &Library, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(library)?);
        return Ok(());
    }

    if library.is_empty() {
        println!("No media found.");
        return Ok(());
    }

    println!("Movies: {}", library.movies.len());
    for movie in &library.movies {
        match movie.year {
            Some(ref year) => print!("  {} ({})", movie.title, year),
            None => print!("  {}", movie.title),
        }
        if movie.files.len() > 1 {
            print!(" [{} files]", movie.files.len());
        }
        if let Some(ref poster) = movie.poster {
            print!(" -> {}", poster.href());
        }
        println!();
    }

    println!("\nSeries: {}", library.series.len());
    for series in &library.series {
        print!("  {} [{} episodes]", series.title, series.episodes.len());
        if let Some(ref poster) = series.poster {
            print!(" -> {}", poster.href());
        }
        println!();
        for episode in &series.episodes {
            let label = episode.episode_label.as_deref().unwrap_or("-");
            println!("    {:<8} {}", label, episode.path.display());
        }
    }

    Ok(())
}

fn find(root: &Path, config: &Config, name: &str, kind: MediaKind) -> Result<()> {
    let matches = Scanner::from_config(&config.library).find(root, name, kind)?;

    if matches.is_empty() {
        println!("No matches for {:?}", name);
        return Ok(());
    }

    for m in &matches {
        match m.episode {
            Some(ref episode) => println!("{}\t{}\t{}", episode, m.name, m.path.display()),
            None => println!("{}\t{}", m.name, m.path.display()),
        }
    }

    Ok(())
}

async fn poster(config: &Config, query: &PosterQuery) -> Result<()> {
    let provider = build_provider(&config.provider)?;
    let cache = PosterCache::new(&config.cache, provider)?;

    match catalog::poster_for(&cache, query).await {
        Some(poster) => {
            println!("{}", poster.href());
            if !poster.is_cached() {
                tracing::warn!("Poster could not be cached, using remote URL");
            }
        }
        None => println!("No poster found for {:?}", query.title),
    }

    Ok(())
}

fn cache_command(config: &Config, action: CacheAction) -> Result<()> {
    let storage = PosterStorage::new(
        config.cache.dir.clone(),
        config.cache.max_width,
        config.cache.max_height,
    );

    match action {
        CacheAction::List => {
            for key in storage.entries()? {
                println!("{}", key);
            }
        }
        CacheAction::Clear => {
            let removed = storage.clear()?;
            println!("Removed {} cached posters from {:?}", removed, storage.dir());
        }
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            config::validate_config(&config)?;
            config
        }
    };

    println!("✓ Configuration is valid");
    println!("  Provider: {:?}", config.provider.kind);
    println!(
        "  API key: {}",
        if config.provider.api_key.is_empty() {
            "not set"
        } else {
            "set"
        }
    );
    match config.library.root {
        Some(ref root) => println!("  Library root: {:?}", root),
        None => println!("  Library root: not set"),
    }
    println!("  Extensions: {}", config.library.extensions.join(", "));
    println!("  Cache dir: {:?}", config.cache.dir);
    println!("  Fallback depth: {}", config.cache.max_fallback_depth);

    Ok(())
}
