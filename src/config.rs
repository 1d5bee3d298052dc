use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use toml;
use tracing::{info, warn};

/// Configuration for the Abhyasa server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Port the HTTP server binds to
    pub port: u16,
    /// Secret used to sign bearer tokens; a development fallback is used
    /// when unset
    pub jwt_secret: Option<String>,
    /// Optional file path for rolling log output
    pub log_file: Option<PathBuf>,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    /// Optional update for database URL
    #[serde(default)]
    pub database_url: Option<String>,
    /// Optional update for the server port
    #[serde(default)]
    pub port: Option<u16>,
    /// Optional update for the token signing secret
    #[serde(default)]
    pub jwt_secret: Option<String>,
    /// Optional update for the log file path
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Command line arguments for the application
#[derive(Parser, Debug)]
#[clap(name = "abhyasa", about = "A study tracking backend for exam preparation")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Server port
    #[clap(long, env = "PORT")]
    pub port: Option<u16>,

    /// Token signing secret
    #[clap(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// Log file path
    #[clap(long, env = "ABHYASA_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            port: update.port.unwrap_or(self.port),
            jwt_secret: update.jwt_secret.or(self.jwt_secret),
            log_file: update.log_file.or(self.log_file),
        }
    }
}

/// Returns the base (default) configuration
///
/// When a data directory is known the database lands there, otherwise it
/// is created next to the binary.
pub fn base_config(data_dir: Option<PathBuf>) -> Config {
    let database_url = data_dir.map_or("abhyasa.db".to_string(), |path| {
        path.join("abhyasa.db").to_string_lossy().to_string()
    });

    Config {
        database_url,
        port: 8000,
        jwt_secret: None,
        log_file: None,
    }
}

/// Loads configuration from a TOML file
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, String> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    match fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<ConfigUpdate>(&content) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", config_path);
                Ok(config)
            }
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                Err(format!("Failed to parse config file: {}", e))
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            Err(format!("Failed to read config file: {}", e))
        }
    }
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url,
        port: args.port,
        jwt_secret: args.jwt_secret,
        log_file: args.log_file,
    }
}

/// Returns the platform config directory for the application, if one can
/// be determined
pub fn get_config_dir_path() -> Option<PathBuf> {
    match ProjectDirs::from("com", "abhyasa", "abhyasa") {
        Some(proj_dirs) => Some(proj_dirs.config_dir().to_path_buf()),
        None => {
            warn!("Could not determine XDG config directory, skipping config file");
            None
        }
    }
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
pub fn get_config(args: CliArgs) -> Config {
    let config_dir = get_config_dir_path().filter(|path| {
        if path.exists() {
            true
        } else {
            info!("Config path not found at {:?}, using defaults", path);
            false
        }
    });

    let base = base_config(config_dir.clone());
    let config_file = config_dir.map(|dir| dir.join("config.toml"));

    // Apply updates in order of increasing precedence
    let config = base
        .apply_update(config_from_file(config_file).unwrap_or_default())
        .apply_update(config_from_args(args));

    info!(
        "Final configuration: database_url={}, port={}, log_file={:?}",
        config.database_url, config.port, config.log_file
    );

    config
}
