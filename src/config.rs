//!
//! src/config.rs  Andrew Belles  Oct 14th, 2026
//!
//! Builds the run configuration once at process start from .env and
//! the environment. Passed explicitly to every stage, nothing global
//!

use std::{path::PathBuf, time};
use url::Url;

use crate::errors::ConfigError;

/// Constants for HTTP Config
pub const HTTP_TIMEOUT: u64 = 8000;
pub const HTTP_CONNECT_TIMEOUT: u64 = 2000;
pub const HTTP_POOL_MAX_IDLE: usize = 4;
pub const HTTP_POOL_IDLE_TIMEOUT: u64 = 90000;
pub const HTTP_MAX_REDIRECTS: u8 = 4;

/// Defaults for a run, each overridable from the environment
pub const DEFAULT_TSV_PATH: &str = "unclaimedmusicalworkrightshares.tsv";
pub const DEFAULT_CACHE_PATH: &str = "isrc_cache.json.zst";
pub const DEFAULT_OUTPUT_PATH: &str = "tritone_task_output.xlsx";
pub const DEFAULT_ARTIST: &str = "spotify:artist:06HL4z0CvFAxyc27GXpf02";
pub const CACHE_ZSTD_LEVEL: i32 = 3;

/// First non-empty value among the given variables
fn env_first(names: &[&str]) -> Option<String> {
    names.iter()
        .filter_map(|n| std::env::var(n).ok())
        .find(|v| !v.trim().is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    env_first(&[name]).unwrap_or_else(|| default.to_string())
}

/// Ensures that url is https
fn ensure_https(url: &Url) -> Result<(), String> {
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(format!("URL must be https: {url}"))
    }
}

pub(crate) fn ensure_host(url: &Url, expected_host: &str) -> Result<(), String> {
    match url.host_str() {
        Some(h) if h.eq_ignore_ascii_case(expected_host) => Ok(()),
        Some(h) => Err(
            format!("Unexpected host for {url} (got {h}, expected {expected_host})")
        ),
        None => Err(format!("URL missing host: {url}"))
    }
}

/// Configuration that Spotify expects when hitting endpoints.
/// Credentials stay optional here; their absence is an auth failure
/// at the first request, not a startup failure.
#[derive(Clone)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub token_url: Url,
    pub api_base: Url,
}

impl std::fmt::Debug for SpotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyConfig")
            .field("client_id", &self.client_id.as_ref().map(|_| "<set>"))
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<set>"))
            .field("token_url", &self.token_url.as_str())
            .field("api_base", &self.api_base.as_str())
            .finish()
    }
}

fn build_spotify() -> Result<SpotifyConfig, ConfigError> {
    let client_id     = env_first(&["SPOTIFY_CLIENT_ID", "SPOTIPY_CLIENT_ID"]);
    let client_secret = env_first(&["SPOTIFY_CLIENT_SECRET", "SPOTIPY_CLIENT_SECRET"]);

    // form urls
    let token_url = env_or("SPOTIFY_TOKEN_URL", "https://accounts.spotify.com/api/token");
    let api_base  = env_or("SPOTIFY_API_BASE", "https://api.spotify.com/v1/");

    let token_url = Url::parse(&token_url)
        .map_err(|e| ConfigError::Invalid(format!("SPOTIFY_TOKEN_URL invalid {e}")))?;
    let mut api_base = Url::parse(&api_base)
        .map_err(|e| ConfigError::Invalid(format!("SPOTIFY_API_BASE invalid {e}")))?;

    // ensure valid https and hostname for both urls
    ensure_https(&token_url).map_err(ConfigError::Invalid)?;
    ensure_https(&api_base).map_err(ConfigError::Invalid)?;
    ensure_host(&token_url, "accounts.spotify.com").map_err(ConfigError::Invalid)?;
    ensure_host(&api_base, "api.spotify.com").map_err(ConfigError::Invalid)?;

    if !api_base.path().ends_with('/') {
        let mut path = api_base.path().to_string();
        path.push('/');
        api_base.set_path(&path);
    }

    Ok( SpotifyConfig { client_id, client_secret, token_url, api_base } )
}

///
/// Configuration for Http timeouts etc. Fixed at compile time.
///
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: time::Duration,
    pub connect_timeout: time::Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: time::Duration,
    pub max_redirects: u8,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: time::Duration::from_millis(HTTP_TIMEOUT),
            connect_timeout: time::Duration::from_millis(HTTP_CONNECT_TIMEOUT),
            pool_max_idle_per_host: HTTP_POOL_MAX_IDLE,
            pool_idle_timeout: time::Duration::from_millis(HTTP_POOL_IDLE_TIMEOUT),
            max_redirects: HTTP_MAX_REDIRECTS,
        }
    }
}

///
/// Where the run reads from and writes to
///
#[derive(Debug, Clone)]
pub struct PathsConfig {
    pub tsv_path: PathBuf,
    pub cache_path: PathBuf,
    pub output_path: PathBuf,
    pub cache_level: i32,
}

fn build_paths() -> PathsConfig {
    PathsConfig {
        tsv_path: PathBuf::from(env_or("ISRC_TSV_PATH", DEFAULT_TSV_PATH)),
        cache_path: PathBuf::from(env_or("ISRC_CACHE_PATH", DEFAULT_CACHE_PATH)),
        output_path: PathBuf::from(env_or("ISRC_OUTPUT_PATH", DEFAULT_OUTPUT_PATH)),
        cache_level: CACHE_ZSTD_LEVEL,
    }
}

///
/// Configuration for Logger
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<LogFormat> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json"   => Some(LogFormat::Json),
            _ => None
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter_directives: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub include_file_line: bool,
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter_directives: "info,isrc_matcher=debug,reqwest=warn".to_string(),
            format: LogFormat::Json,
            with_ansi: true,
            include_file_line: true,
            include_target: true,
        }
    }
}

fn build_logging() -> Result<LoggingConfig, ConfigError> {
    let mut logging = LoggingConfig::default();
    if let Some(raw) = env_first(&["ISRC_LOG_FORMAT"]) {
        logging.format = LogFormat::parse(&raw).ok_or_else(||
            ConfigError::Invalid(format!("ISRC_LOG_FORMAT must be json or pretty, got {raw}"))
        )?;
    }
    Ok(logging)
}

///
/// AppConfig which holds everything the pipeline needs
///
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub artist: String,
    pub spotify: SpotifyConfig,
    pub http: HttpConfig,
    pub paths: PathsConfig,
    pub logging: LoggingConfig
}

///
/// Return all environment variables to caller at program start.
///
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();

    let artist  = env_or("ISRC_ARTIST", DEFAULT_ARTIST);
    let spotify = build_spotify()?;
    let http    = HttpConfig::default();
    let paths   = build_paths();
    let logging = build_logging()?;

    Ok( AppConfig { artist, spotify, http, paths, logging } )
}
