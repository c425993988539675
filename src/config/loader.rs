use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::WrapgenConfig;
use crate::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".wrapgen.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse `.wrapgen.toml` contents. `path` is only used for error messages.
pub fn parse_config(contents: &str, path: &Path) -> Result<WrapgenConfig> {
    toml::from_str::<WrapgenConfig>(contents).map_err(|e| Error::config(path, e.to_string()))
}

fn try_load_config_from_path(config_path: &Path) -> Option<WrapgenConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to read config file {}: {}", config_path.display(), e);
            }
            return None;
        }
    };

    match parse_config(&contents, config_path) {
        Ok(config) => {
            debug!("Loaded config from {}", config_path.display());
            let base = config_path.parent().unwrap_or_else(|| Path::new("."));
            Some(config.relative_to(base))
        }
        Err(e) => {
            warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Directories from `start` up towards the root, at most `max_depth` of them
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find the nearest `.wrapgen.toml` above `start`, or defaults.
pub fn load_config_from(start: PathBuf) -> WrapgenConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            WrapgenConfig::default()
        })
}

pub fn load_config() -> WrapgenConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(dir),
        Err(e) => {
            warn!("Failed to get current directory: {}. Using default config.", e);
            WrapgenConfig::default()
        }
    }
}
