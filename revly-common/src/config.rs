//! Configuration loading
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file (`revly.toml` in the working directory)
//! 4. Compiled default (fallback)
//!
//! Missing upstream credentials are not an error: the service degrades
//! to mock data (Hostaway) or an empty degraded feed (Google).

use std::path::PathBuf;

/// Hostaway API credentials
#[derive(Debug, Clone)]
pub struct HostawayCredentials {
    pub account_id: String,
    pub access_token: String,
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind address
    pub bind_addr: String,
    /// Directory holding approvals.json and mock source data
    pub data_dir: PathBuf,
    /// Hostaway API credentials; None means mock data only
    pub hostaway: Option<HostawayCredentials>,
    /// Google Places API key; None disables the Google channel
    pub google_api_key: Option<String>,
    /// Use the Hostaway sandbox base URL instead of production
    pub use_sandbox: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5870".to_string(),
            data_dir: PathBuf::from("data"),
            hostaway: None,
            google_api_key: None,
            use_sandbox: false,
        }
    }
}

impl Config {
    /// Load configuration, applying the CLI > env > TOML > default
    /// priority order for each setting.
    pub fn load(cli_bind: Option<&str>, cli_data_dir: Option<&str>) -> Self {
        let file = load_config_file();
        let defaults = Self::default();

        let bind_addr = cli_bind
            .map(str::to_string)
            .or_else(|| std::env::var("REVLY_BIND").ok())
            .or_else(|| file_str(&file, "bind_addr"))
            .unwrap_or(defaults.bind_addr);

        let data_dir = cli_data_dir
            .map(PathBuf::from)
            .or_else(|| std::env::var("REVLY_DATA_DIR").ok().map(PathBuf::from))
            .or_else(|| file_str(&file, "data_dir").map(PathBuf::from))
            .unwrap_or(defaults.data_dir);

        let hostaway = match (
            std::env::var("HOSTAWAY_ACCOUNT_ID").ok(),
            std::env::var("HOSTAWAY_ACCESS_TOKEN").ok(),
        ) {
            (Some(account_id), Some(access_token))
                if !account_id.is_empty() && !access_token.is_empty() =>
            {
                Some(HostawayCredentials {
                    account_id,
                    access_token,
                })
            }
            _ => None,
        };

        let google_api_key = std::env::var("GOOGLE_PLACES_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let use_sandbox = std::env::var("USE_SANDBOX")
            .map(|v| v == "true")
            .ok()
            .or_else(|| file_bool(&file, "use_sandbox"))
            .unwrap_or(defaults.use_sandbox);

        Self {
            bind_addr,
            data_dir,
            hostaway,
            google_api_key,
            use_sandbox,
        }
    }
}

/// Best-effort read of ./revly.toml; any failure means "no file settings"
fn load_config_file() -> Option<toml::Value> {
    let content = std::fs::read_to_string("revly.toml").ok()?;
    match toml::from_str(&content) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(error = %err, "ignoring unparseable revly.toml");
            None
        }
    }
}

fn file_str(file: &Option<toml::Value>, key: &str) -> Option<String> {
    file.as_ref()?
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn file_bool(file: &Option<toml::Value>, key: &str) -> Option<bool> {
    file.as_ref()?.get(key).and_then(toml::Value::as_bool)
}
