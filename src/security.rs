use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Scheme expected in the `Authorization` header
pub const TOKEN_SCHEME: &str = "Token";

// =============================================================================
// API Tokens
// =============================================================================

/// Hash an API token with the server-side secret
///
/// Only the keyed hash is stored, so a leaked database alone does not
/// reveal usable tokens. Lookups hash the presented token the same way.
///
/// # Algorithm
/// `token_hash = HMAC-SHA256(secret, token)` (hex encoded)
pub fn hash_token(token: &str, secret: &str) -> String {
    // HMAC accepts keys of any length, including empty ones
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC-SHA256 accepts any key length"));
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Extract the raw token from an `Authorization: Token <key>` header value
///
/// Returns `None` for other schemes or an empty key.
pub fn parse_token_header(value: &str) -> Option<&str> {
    let (scheme, key) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(TOKEN_SCHEME) {
        return None;
    }
    let key = key.trim();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

/// SHA-256 of arbitrary content, hex encoded
///
/// Stored images are named after their content so re-uploads of the
/// same picture share one file.
pub fn content_digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_keyed() {
        let a = hash_token("token-1", "secret-a");
        let b = hash_token("token-1", "secret-b");

        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert_eq!(a, hash_token("token-1", "secret-a"));
    }

    #[test]
    fn test_parse_token_header() {
        assert_eq!(parse_token_header("Token abc123"), Some("abc123"));
        assert_eq!(parse_token_header("token   abc123 "), Some("abc123"));
        assert_eq!(parse_token_header("Bearer abc123"), None);
        assert_eq!(parse_token_header("Token "), None);
        assert_eq!(parse_token_header("abc123"), None);
    }

    #[test]
    fn test_content_digest() {
        // SHA-256 of the empty input
        assert_eq!(
            content_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
