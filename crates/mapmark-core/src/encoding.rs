//! Self-contained image payloads for embedding in documents.
//!
//! Saved documents must be portable across sessions and machines, so
//! images travel as `data:` URIs rather than file references.

use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

/// Image bytes could not be turned into (or recovered from) an embedded
/// payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("not a data URI")]
    NotDataUri,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("unrecognized image format")]
    UnknownFormat,
    #[error("image decoding failed: {0}")]
    Pixels(String),
}

/// Image format for embedded image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// Get the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        None
    }
}

/// Encode raw image bytes as a self-contained data URI.
///
/// The format is sniffed from the magic bytes; unrecognized input is an
/// error rather than a silently broken payload.
pub fn to_data_uri(bytes: &[u8]) -> Result<String, DecodeError> {
    let format = ImageFormat::from_magic_bytes(bytes).ok_or(DecodeError::UnknownFormat)?;
    Ok(format!(
        "data:{};base64,{}",
        format.mime_type(),
        STANDARD.encode(bytes)
    ))
}

/// Recover the raw image bytes from a data URI.
pub fn payload_of(uri: &str) -> Result<Vec<u8>, DecodeError> {
    let rest = uri.strip_prefix("data:").ok_or(DecodeError::NotDataUri)?;
    let (_mime, payload) = rest.split_once(";base64,").ok_or(DecodeError::NotDataUri)?;
    Ok(STANDARD.decode(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(b"RIFF\x00\x00\x00\x00WEBP"),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF8"), None);
        assert_eq!(ImageFormat::from_magic_bytes(&[0x89]), None);
    }

    #[test]
    fn test_data_uri_round_trip() {
        let bytes = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];
        let uri = to_data_uri(&bytes).unwrap();

        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(payload_of(&uri).unwrap(), bytes);
    }

    #[test]
    fn test_unknown_format_is_an_error() {
        let result = to_data_uri(b"not an image at all");
        assert!(matches!(result, Err(DecodeError::UnknownFormat)));
    }

    #[test]
    fn test_payload_rejects_non_data_uri() {
        assert!(matches!(
            payload_of("https://example.com/map.png"),
            Err(DecodeError::NotDataUri)
        ));
        assert!(matches!(
            payload_of("data:image/png,plain-not-base64"),
            Err(DecodeError::NotDataUri)
        ));
    }

    #[test]
    fn test_payload_rejects_bad_base64() {
        assert!(matches!(
            payload_of("data:image/png;base64,@@@@"),
            Err(DecodeError::Base64(_))
        ));
    }
}
