mod types;

pub use types::*;

use anyhow::{Context, Result};
use reelshelf_common::Error;
use std::path::{Path, PathBuf};

/// Upper bound accepted for `cache.max_fallback_depth`.
pub const MAX_FALLBACK_DEPTH_LIMIT: u32 = 10;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    normalize_extensions(&mut config.library.extensions);
    expand_paths(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./reelshelf.toml",
        "./config.toml",
        "~/.config/reelshelf/config.toml",
        "/etc/reelshelf/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Expand `~` and environment variables in configured paths.
fn expand_paths(config: &mut Config) {
    if let Some(root) = config.library.root.take() {
        config.library.root = Some(expand(&root));
    }
    config.cache.dir = expand(&config.cache.dir);
}

fn expand(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            tracing::warn!("Could not expand {:?}: {}", path, e);
            path.to_path_buf()
        }
    }
}

/// Extensions are compared lowercase and without the leading dot.
fn normalize_extensions(extensions: &mut [String]) {
    for ext in extensions.iter_mut() {
        *ext = ext.trim().trim_start_matches('.').to_lowercase();
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<(), Error> {
    let cache = &config.cache;
    if cache.max_width == 0 || cache.max_height == 0 {
        return Err(Error::config("cache.max_width and cache.max_height must be > 0"));
    }
    if cache.max_download_bytes == 0 {
        return Err(Error::config("cache.max_download_bytes must be > 0"));
    }
    if cache.fetch_timeout_secs == 0 {
        return Err(Error::config("cache.fetch_timeout_secs must be > 0"));
    }
    if cache.max_fallback_depth > MAX_FALLBACK_DEPTH_LIMIT {
        return Err(Error::config(format!(
            "cache.max_fallback_depth must be <= {}",
            MAX_FALLBACK_DEPTH_LIMIT
        )));
    }
    if config.provider.request_timeout_secs == 0 {
        return Err(Error::config("provider.request_timeout_secs must be > 0"));
    }
    if config.library.extensions.is_empty() {
        return Err(Error::config("library.extensions cannot be empty"));
    }

    if config.provider.kind != ProviderKind::None && config.provider.api_key.is_empty() {
        tracing::warn!(
            "Provider {:?} has no API key; poster lookups will return nothing",
            config.provider.kind
        );
    }

    if let Some(root) = &config.library.root {
        if !root.exists() {
            tracing::warn!("Library root does not exist: {:?}", root);
        }
    }

    Ok(())
}
