//! Byte-level helpers shared by insertion and search.
//!
//! Paths and patterns are treated as opaque byte sequences. Only the separator
//! and the two marker bytes carry meaning, so splitting never depends on how
//! the surrounding text is encoded.

use std::borrow::Cow;

use percent_encoding::percent_decode;

use crate::{Result, RouteError};

/// Path separator.
pub const SEPARATOR: u8 = b'/';

/// Leading byte of a named wildcard token, e.g. `:id`.
pub const WILDCARD: u8 = b':';

/// Leading byte of a trailing catch-all token, e.g. `*rest`.
pub const CATCH_ALL: u8 = b'*';

/// Finds the length of the common prefix between a key and a node's segment.
///
/// Returns the number of bytes that match starting from the given offset.
pub fn prefix_match(key: &[u8], start_idx: usize, node_key: &[u8]) -> usize {
    let mut i = 0;

    while i < node_key.len() && start_idx + i < key.len() && key[start_idx + i] == node_key[i] {
        i += 1;
    }

    i
}

/// Returns the index of the next separator in `path`, or `path.len()` if there is none.
pub fn next_separator(path: &[u8]) -> usize {
    path.iter()
        .position(|&b| b == SEPARATOR)
        .unwrap_or_else(|| path.len())
}

/// Splits the next pattern token off `path`.
///
/// A leading separator is a token of its own; otherwise the token runs up to
/// (excluding) the next separator, or to the end of the pattern.
pub fn split_token(path: &[u8]) -> (&[u8], &[u8]) {
    let end = match path.first() {
        Some(&SEPARATOR) => 1,
        _ => next_separator(path),
    };

    path.split_at(end)
}

/// Checks a whole pattern before any node is created for it.
///
/// Rejects markers in the middle of a static token, anything after a
/// catch-all token, and wildcard or catch-all tokens without a name.
/// Wildcard and catch-all names may contain further marker bytes.
pub fn validate_pattern(pattern: &[u8]) -> Result<()> {
    let mut rest = pattern;

    while !rest.is_empty() {
        let (token, remaining) = split_token(rest);

        match token[0] {
            CATCH_ALL => {
                if token.len() == 1 {
                    return Err(RouteError::MissingParamName {
                        pattern: lossy(pattern),
                    });
                }
                if !remaining.is_empty() {
                    return Err(RouteError::SeparatorAfterCatchAll {
                        pattern: lossy(pattern),
                    });
                }
            }
            WILDCARD => {
                if token.len() == 1 {
                    return Err(RouteError::MissingParamName {
                        pattern: lossy(pattern),
                    });
                }
            }
            _ => {
                if token.iter().any(|&b| b == WILDCARD || b == CATCH_ALL) {
                    return Err(RouteError::MalformedToken { token: lossy(token) });
                }
            }
        }

        rest = remaining;
    }

    Ok(())
}

/// Decodes a matched wildcard token the way a URL query component is decoded.
///
/// `+` becomes a space, `%XX` must be a complete hex escape, and the result
/// must be valid UTF-8.
pub fn decode_param(raw: &[u8]) -> Result<String> {
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%' {
            let escape_ok = raw.len() > i + 2
                && raw[i + 1].is_ascii_hexdigit()
                && raw[i + 2].is_ascii_hexdigit();
            if !escape_ok {
                return Err(RouteError::ParamDecodeError { value: lossy(raw) });
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let spaced: Cow<'_, [u8]> = if raw.contains(&b'+') {
        Cow::Owned(
            raw.iter()
                .map(|&b| if b == b'+' { b' ' } else { b })
                .collect(),
        )
    } else {
        Cow::Borrowed(raw)
    };

    percent_decode(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| RouteError::ParamDecodeError { value: lossy(raw) })
}

/// Renders bytes for error messages and dumps.
pub fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_match() {
        let key = b"abcdef";
        let node_key = b"abc";

        assert_eq!(prefix_match(key, 0, node_key), 3);

        let matching_key = b"bc";
        assert_eq!(prefix_match(key, 1, matching_key), 2);

        let different_key = b"xyz";
        assert_eq!(prefix_match(key, 0, different_key), 0);

        // Stops at the shorter of the two
        assert_eq!(prefix_match(b"ab", 0, b"abc"), 2);
    }

    #[test]
    fn test_split_token() {
        assert_eq!(split_token(b"/users/:id"), (&b"/"[..], &b"users/:id"[..]));
        assert_eq!(split_token(b"users/:id"), (&b"users"[..], &b"/:id"[..]));
        assert_eq!(split_token(b":id"), (&b":id"[..], &b""[..]));
        assert_eq!(split_token(b"*rest"), (&b"*rest"[..], &b""[..]));
    }

    #[test]
    fn test_validate_pattern() {
        assert!(validate_pattern(b"/users/:id/posts/*rest").is_ok());
        assert!(validate_pattern(b"").is_ok());
        assert!(validate_pattern(b"*all").is_ok());

        assert!(matches!(
            validate_pattern(b"/files/*rest/more"),
            Err(RouteError::SeparatorAfterCatchAll { .. })
        ));
        assert!(matches!(
            validate_pattern(b"/user:id"),
            Err(RouteError::MalformedToken { .. })
        ));
        assert!(matches!(
            validate_pattern(b"/a*b"),
            Err(RouteError::MalformedToken { .. })
        ));
        // Markers after the leading one are part of the parameter name
        assert!(validate_pattern(b"/:id:name").is_ok());
        assert!(validate_pattern(b"/files/*a:b").is_ok());
        assert!(matches!(
            validate_pattern(b"/users/:"),
            Err(RouteError::MissingParamName { .. })
        ));
        assert!(matches!(
            validate_pattern(b"/files/*"),
            Err(RouteError::MissingParamName { .. })
        ));
    }

    #[test]
    fn test_decode_param() {
        assert_eq!(decode_param(b"hello%20world").unwrap(), "hello world");
        assert_eq!(decode_param(b"a+b").unwrap(), "a b");
        assert_eq!(decode_param(b"a%2Bb").unwrap(), "a+b");
        assert_eq!(decode_param(b"caf%C3%A9").unwrap(), "café");
        assert_eq!(decode_param(b"plain").unwrap(), "plain");
    }

    #[test]
    fn test_decode_param_rejects_bad_escapes() {
        assert!(decode_param(b"%zz").is_err());
        assert!(decode_param(b"abc%2").is_err());
        assert!(decode_param(b"%").is_err());
        // Valid escape, invalid UTF-8
        assert!(decode_param(b"%FF").is_err());
    }
}
