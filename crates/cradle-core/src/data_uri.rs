//! Parsing of `data:` URIs carrying uploaded files.
//!
//! Clients send files inline as `data:<mime>;base64,<payload>`. Only base64
//! payloads are accepted; the decoded bytes are what gets handed to storage.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUriError {
    #[error("Invalid file format. Please provide a valid base64-encoded data URI")]
    MissingScheme,

    #[error("Malformed data URI: missing ',' separator")]
    MissingSeparator,

    #[error("Data URI must be base64-encoded")]
    NotBase64,

    #[error("Data URI payload is empty")]
    EmptyPayload,

    #[error("Data URI payload is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("Invalid image. Please provide a valid base64-encoded image")]
    NotAnImage,
}

/// A decoded `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl DataUri {
    /// Parse and decode a `data:` URI.
    ///
    /// The media type defaults to `application/octet-stream` when omitted,
    /// matching RFC 2397.
    pub fn parse(input: &str) -> Result<Self, DataUriError> {
        let rest = input
            .trim()
            .strip_prefix("data:")
            .ok_or(DataUriError::MissingScheme)?;

        let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingSeparator)?;

        let mut params = header.split(';');
        let mime_type = match params.next() {
            Some(m) if !m.is_empty() => m.trim().to_lowercase(),
            _ => "application/octet-stream".to_string(),
        };
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(DataUriError::NotBase64);
        }

        let payload = payload.trim();
        if payload.is_empty() {
            return Err(DataUriError::EmptyPayload);
        }

        let data = STANDARD
            .decode(payload)
            .map_err(|e| DataUriError::InvalidBase64(e.to_string()))?;
        if data.is_empty() {
            return Err(DataUriError::EmptyPayload);
        }

        Ok(DataUri { mime_type, data })
    }

    /// Parse a `data:` URI and require an `image/*` media type.
    pub fn parse_image(input: &str) -> Result<Self, DataUriError> {
        if !input.trim_start().starts_with("data:image/") {
            return Err(DataUriError::NotAnImage);
        }
        Self::parse(input)
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// File extension used when building storage keys.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            "application/pdf" => "pdf",
            "application/json" => "json",
            "application/zip" => "zip",
            "application/vnd.ms-excel" => "xls",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => "xlsx",
            "text/csv" => "csv",
            "text/plain" => "txt",
            _ => "bin",
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
