//! URI-safe lz-string tokens.
//!
//! Compatible with the JavaScript library's `compressToEncodedURIComponent`
//! and `decompressFromEncodedURIComponent`, so links made by either side
//! decode on the other.

/// Characters a compressed token may contain.
pub const URI_SAFE_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+-$";

/// Compress `input` into a URI-safe token.
#[must_use]
pub fn compress_to_uri(input: &str) -> String {
    lz_str::compress_to_encoded_uri_component(input)
}

/// Decompress a token made by [`compress_to_uri`].
///
/// Spaces are read as `+` (form decoding turns one into the other). Empty
/// input, characters outside the alphabet and bit streams that do not form
/// valid UTF-16 all yield `None`.
#[must_use]
pub fn decompress_from_uri(input: &str) -> Option<String> {
    let token = input.trim().replace(' ', "+");
    if token.is_empty() || !token.chars().all(|c| URI_SAFE_ALPHABET.contains(c)) {
        return None;
    }
    let units = lz_str::decompress_from_encoded_uri_component(token.as_str())?;
    String::from_utf16(&units).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_ascii() {
        let input = r#"{"i":"gaming","b":{"c":"Acme"},"d":false,"ps":"g"}"#;
        let packed = compress_to_uri(input);
        assert_eq!(decompress_from_uri(&packed).as_deref(), Some(input));
    }

    #[test]
    fn test_round_trip_repetitive() {
        let input = "abababababababababababababababababab".repeat(20);
        let packed = compress_to_uri(&input);
        assert!(packed.len() < input.len());
        assert_eq!(decompress_from_uri(&packed), Some(input));
    }

    #[test]
    fn test_round_trip_non_ascii() {
        let input = "Café ☕ — naïve 日本語 🎮";
        let packed = compress_to_uri(input);
        assert_eq!(decompress_from_uri(&packed).as_deref(), Some(input));
    }

    #[test]
    fn test_output_alphabet() {
        let packed = compress_to_uri("The quick brown fox jumps over the lazy dog");
        assert!(
            packed
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'-')
        );
    }

    #[test]
    fn test_empty_string() {
        let packed = compress_to_uri("");
        assert!(!packed.is_empty());
        assert_eq!(decompress_from_uri(&packed).as_deref(), Some(""));
    }

    #[test]
    fn test_spaces_read_as_plus() {
        let input = "hello hello hello world";
        let packed = compress_to_uri(input);
        if packed.contains('+') {
            let spaced = packed.replace('+', " ");
            assert_eq!(decompress_from_uri(&spaced).as_deref(), Some(input));
        }
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(decompress_from_uri(""), None);
        assert_eq!(decompress_from_uri("!!!"), None);
        assert_eq!(decompress_from_uri("%%%%"), None);
    }

    #[test]
    fn test_rejects_truncated() {
        let input = r#"{"i":"saas","b":{"c":"Northwind Traders","l":"https://example.com/logo.png"}}"#;
        let packed = compress_to_uri(input);
        let truncated = &packed[..packed.len() / 2];
        assert_ne!(decompress_from_uri(truncated).as_deref(), Some(input));
    }
}
