//!
//! src/errors.rs  Andrew Belles  Oct 14th, 2026
//!
//! Defines one error enum per pipeline stage and the run level
//! error the dispatcher in main uses to decide whether to proceed
//!
//!

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Invalid(String),
}

/// Reference-set loader failures
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("reference file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("tsv error: {0}")]
    Tsv(String),
    #[error("cache error: {0}")]
    Cache(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self { LoadError::Tsv(e.to_string()) }
}

/// Catalog fetcher failures
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("auth error: {0}")]
    Auth(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self { FetchError::Http(e.to_string()) }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self { FetchError::Parse(e.to_string()) }
}

/// Spreadsheet writer failures
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("xlsx error: {0}")]
    Xlsx(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rust_xlsxwriter::XlsxError> for ReportError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self { ReportError::Xlsx(e.to_string()) }
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl RunError {
    pub fn stage(&self) -> &'static str {
        match self {
            RunError::Config(_) => "config",
            RunError::Load(_)   => "loader",
            RunError::Fetch(_)  => "fetcher",
            RunError::Report(_) => "reporter",
        }
    }
}
