use std::{fmt, io};

use http::status::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;
use url::ParseError as UrlParseError;

#[cfg(feature = "http")]
use reqwest::Error as ReqwestError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum FolioError {
    #[error("Working-copy cache error: {0}")]
    Cache(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Credential error: {0}")]
    Credential(String),
    #[error("Invalid edit operation: {0}")]
    Edit(String),
    #[error("Export failed: {0}")]
    Export(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("An authentication attempt is already in progress")]
    OperationPending,
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
    #[error("Content service error: {0}")]
    Service(String),
}

impl FolioError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FolioError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FolioError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FolioError::Credential(_) => StatusCode::UNAUTHORIZED,
            FolioError::Edit(_) => StatusCode::BAD_REQUEST,
            FolioError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FolioError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FolioError::NotFound(_) => StatusCode::NOT_FOUND,
            FolioError::OperationPending => StatusCode::CONFLICT,
            FolioError::PermissionDenied => StatusCode::FORBIDDEN,
            FolioError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FolioError::Service(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<toml::de::Error> for FolioError {
    fn from(src: toml::de::Error) -> FolioError {
        FolioError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for FolioError {
    fn from(src: toml::ser::Error) -> FolioError {
        FolioError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for FolioError {
    fn from(src: JsonError) -> FolioError {
        FolioError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<UrlParseError> for FolioError {
    fn from(src: UrlParseError) -> FolioError {
        FolioError::Serialization(format!("Invalid URL: {src}"))
    }
}

impl From<base64::DecodeError> for FolioError {
    fn from(src: base64::DecodeError) -> FolioError {
        FolioError::Credential(format!("Invalid base64 field: {src}"))
    }
}

impl From<io::Error> for FolioError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => FolioError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => FolioError::PermissionDenied,
            _ => FolioError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<fmt::Error> for FolioError {
    fn from(x: fmt::Error) -> Self {
        FolioError::Serialization(format!("{x}"))
    }
}

#[cfg(feature = "http")]
impl From<ReqwestError> for FolioError {
    fn from(x: ReqwestError) -> Self {
        if x.is_timeout() || x.is_connect() {
            FolioError::Service(format!("content fetch failed: {x}"))
        } else if x.is_decode() {
            FolioError::Serialization(format!("content body decode failed: {x}"))
        } else {
            FolioError::Service(format!("{x}"))
        }
    }
}
