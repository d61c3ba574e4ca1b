//! Audio payload handling: the browser ships takes as base64 (often with a
//! data-URL prefix), we persist raw bytes on disk and hand them back as a
//! `data:audio/wav` URL the `<audio>` element can play directly.

mod storage;

pub use storage::{AudioStore, MediaError};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Error, Result};

/// Decodes a client audio payload. Accepts both bare base64 and data URLs
/// (`data:audio/wav;base64,<payload>`); everything up to the first comma is
/// treated as the media-type prefix and discarded.
pub fn decode_audio_payload(payload: &str) -> Result<Vec<u8>> {
    let encoded = match payload.split_once(',') {
        Some((_prefix, rest)) => rest,
        None => payload,
    };

    STANDARD
        .decode(encoded)
        .map_err(|e| Error::Format(e.to_string()))
}

/// Encodes stored audio bytes as a data URL for playback responses.
#[must_use]
pub fn encode_audio_payload(data: &[u8]) -> String {
    format!("data:audio/wav;base64,{}", STANDARD.encode(data))
}

/// Builds the on-disk file name for a take: `<name>_<user_id>_<unix_secs>.wav`.
/// Path separators and NULs in the user-supplied name are flattened so the
/// result always stays a single path segment.
#[must_use]
pub fn audio_file_name(name: &str, user_id: i64, timestamp: i64) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect();

    format!("{sanitized}_{user_id}_{timestamp}.wav")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bare_base64() {
        let decoded = decode_audio_payload("aGVsbG8=").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn test_decode_data_url() {
        let decoded = decode_audio_payload("data:audio/wav;base64,aGVsbG8=").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn test_decode_splits_on_first_comma_only() {
        // base64 never contains commas, so anything after the first one is payload
        let result = decode_audio_payload("data:audio/wav;base64,aGVsbG8=,extra");
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        assert!(decode_audio_payload("not base64!!!").is_err());
        assert!(decode_audio_payload("data:audio/wav;base64,???").is_err());
    }

    #[test]
    fn test_encode_round_trip() {
        let url = encode_audio_payload(b"hello");
        assert_eq!(url, "data:audio/wav;base64,aGVsbG8=");
        assert_eq!(decode_audio_payload(&url).unwrap(), b"hello");
    }

    #[test]
    fn test_audio_file_name() {
        assert_eq!(
            audio_file_name("scales", 7, 1700000000),
            "scales_7_1700000000.wav"
        );
    }

    #[test]
    fn test_audio_file_name_flattens_separators() {
        assert_eq!(
            audio_file_name("../../etc/passwd", 7, 1700000000),
            ".._.._etc_passwd_7_1700000000.wav"
        );
        assert_eq!(
            audio_file_name("a\\b", 7, 1700000000),
            "a_b_7_1700000000.wav"
        );
    }
}
