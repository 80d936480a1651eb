//! Decoding raw file bytes into source text

use encoding_rs::{Encoding, UTF_8};

/// Source text decoded from a file, with the encoding it was read as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSource {
    pub text: String,
    pub encoding: &'static str,
}

/// Decode `bytes` to UTF-8 text, or `None` when the file looks binary
///
/// A byte-order mark selects its encoding and is stripped. Without one, NUL
/// bytes or malformed UTF-8 mark the file as binary.
pub fn decode_source(bytes: &[u8]) -> Option<DecodedSource> {
    if let Some((encoding, _bom_length)) = Encoding::for_bom(bytes) {
        return decode_with(encoding, bytes);
    }

    if bytes.contains(&0) {
        tracing::debug!("File contains NUL bytes - skipping as binary");
        return None;
    }

    // Fast path: already valid UTF-8
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Some(DecodedSource {
            text: text.to_string(),
            encoding: UTF_8.name(),
        });
    }

    decode_with(UTF_8, bytes)
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> Option<DecodedSource> {
    let (decoded, actual_encoding, malformed) = encoding.decode(bytes);

    if malformed {
        tracing::debug!(
            "File appears to be binary (encoding errors detected with {})",
            actual_encoding.name()
        );
        return None;
    }

    Some(DecodedSource {
        text: decoded.into_owned(),
        encoding: actual_encoding.name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_utf8_passes_through() {
        let decoded = decode_source("fn main() { println!(\"héllo\"); }".as_bytes()).unwrap();
        assert_eq!(decoded.encoding, "UTF-8");
        assert!(decoded.text.contains("héllo"));
    }

    #[test]
    fn test_nul_bytes_mark_binary() {
        assert!(decode_source(b"\x7fELF\x02\x01\x00\x00").is_none());
    }

    #[test]
    fn test_invalid_utf8_marks_binary() {
        assert!(decode_source(&[0x66, 0x6e, 0xff, 0xfe, 0xfd, 0x20]).is_none());
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let decoded = decode_source(b"\xEF\xBB\xBFdef f(): pass").unwrap();
        assert_eq!(decoded.text, "def f(): pass");
    }

    #[test]
    fn test_utf16_with_bom_is_decoded() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "let a = 1;".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let decoded = decode_source(&bytes).unwrap();
        assert_eq!(decoded.encoding, "UTF-16LE");
        assert_eq!(decoded.text, "let a = 1;");
    }
}
