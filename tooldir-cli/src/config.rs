//! Environment loading
//!
//! Priority order (highest to lowest):
//! 1. Variables already set in the environment
//! 2. Current directory .env
//! 3. ~/.tooldir/.env

use std::path::PathBuf;

/// Get the tooldir config directory path (~/.tooldir)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tooldir"))
}

/// Load .env files; missing or unreadable files are skipped.
///
/// Runs before argument parsing so `env = ...` flags see the values, and
/// therefore before tracing is up: returns the files it read for logging.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(path);
    }

    // dotenvy never overwrites, so the cwd file wins over this one
    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded_from.push(env_file);
        }
    }

    loaded_from
}

/// Report which .env files were applied.
pub fn log_loaded(loaded_from: &[PathBuf]) {
    if loaded_from.is_empty() {
        tracing::debug!("No .env files found (current dir or ~/.tooldir)");
    } else {
        let paths: Vec<String> = loaded_from.iter().map(|p| p.display().to_string()).collect();
        tracing::info!("Loaded configuration from: {}", paths.join(", "));
    }
}
