//! Option schemas for the built-in transports.
//!
//! Each struct mirrors the keyword parameters its transport's `open` accepts.
//! The defaults here are what a caller gets when it passes nothing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default read buffer for streaming transports (128 KiB)
pub const DEFAULT_BUFFER_SIZE: u64 = 128 * 1024;

/// Default multipart upload part size (50 MiB)
pub const DEFAULT_MIN_PART_SIZE: u64 = 50 * 1024 * 1024;

/// Keyword parameters accepted by the HTTP(S) transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpOptions {
    pub kerberos: bool,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Client certificate path, or a `[cert, key]` pair
    pub cert: Option<Value>,
    pub headers: Option<serde_json::Map<String, Value>>,
    /// Request timeout in seconds
    pub timeout: Option<f64>,
    pub buffer_size: u64,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            kerberos: false,
            user: None,
            password: None,
            cert: None,
            headers: None,
            timeout: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Keyword parameters accepted by the S3 transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct S3Options {
    pub version_id: Option<String>,
    pub buffer_size: u64,
    pub min_part_size: u64,
    pub multipart_upload: bool,
    pub defer_seek: bool,
    /// Extra keyword arguments forwarded to the S3 client constructor
    pub client_kwargs: Option<serde_json::Map<String, Value>>,
}

impl Default for S3Options {
    fn default() -> Self {
        Self {
            version_id: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            min_part_size: DEFAULT_MIN_PART_SIZE,
            multipart_upload: true,
            defer_seek: false,
            client_kwargs: None,
        }
    }
}

/// Keyword parameters accepted by the WebHDFS transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebHdfsOptions {
    pub min_part_size: u64,
    /// Request timeout in seconds
    pub timeout: Option<f64>,
}

impl Default for WebHdfsOptions {
    fn default() -> Self {
        Self {
            min_part_size: DEFAULT_MIN_PART_SIZE,
            timeout: None,
        }
    }
}
