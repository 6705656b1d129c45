//! Store path rules
//!
//! A store path is relative and slash separated. The root is spelled `.`;
//! every other valid path is a non-empty run of segments, none of which is
//! empty, `.` or `..`.

use veil_core::{Error, Result};

/// Name of the store root
pub const ROOT: &str = ".";

/// Whether `path` satisfies the store path rules
pub fn is_valid(path: &str) -> bool {
    if path == ROOT {
        return true;
    }
    !path.is_empty()
        && path.split('/').all(|seg| {
            !seg.is_empty() && seg != "." && seg != ".." && !seg.contains(['\\', '\0'])
        })
}

/// Reject paths that break the store path rules
pub fn validate(path: &str) -> Result<()> {
    if is_valid(path) {
        Ok(())
    } else {
        Err(Error::InvalidPath(path.to_string()))
    }
}

/// Join a child name onto a directory path
pub fn join(dir: &str, name: &str) -> String {
    if dir == ROOT {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Last segment of a store path
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Map a decoded request path onto a store path.
///
/// Surrounding slashes are dropped and the bare root becomes [`ROOT`]. The
/// result is not validated; the store does that.
pub fn from_request(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        ROOT.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Percent-decode a request path.
///
/// Returns `None` for malformed escapes or when the decoded bytes are not UTF-8.
pub fn percent_decode(path: &str) -> Option<String> {
    if !path.contains('%') {
        return Some(path.to_string());
    }

    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = hex_value(*bytes.get(i + 1)?)?;
            let lo = hex_value(*bytes.get(i + 2)?)?;
            out.push((hi << 4) | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_paths() {
        assert!(is_valid("."));
        assert!(is_valid("index.html"));
        assert!(is_valid("css/styles.css"));
        assert!(is_valid(".env"));
    }

    #[test]
    fn test_invalid_paths() {
        for path in ["", "/etc/passwd", "css/", "a//b", "./a", "a/./b", "../etc/passwd", "a/..", "a\\b"] {
            assert!(!is_valid(path), "{:?} should be invalid", path);
        }
        assert!(matches!(validate(".."), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_join() {
        assert_eq!(join(".", "index.html"), "index.html");
        assert_eq!(join("sub/dir", "index.html"), "sub/dir/index.html");
    }

    #[test]
    fn test_from_request() {
        assert_eq!(from_request("/"), ".");
        assert_eq!(from_request(""), ".");
        assert_eq!(from_request("/css/"), "css");
        assert_eq!(from_request("/css/styles.css"), "css/styles.css");
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/a%20b.txt").as_deref(), Some("/a b.txt"));
        assert_eq!(percent_decode("/%2eenv").as_deref(), Some("/.env"));
        assert_eq!(percent_decode("/plain").as_deref(), Some("/plain"));
        assert_eq!(percent_decode("/bad%2"), None);
        assert_eq!(percent_decode("/bad%zz"), None);
        assert_eq!(percent_decode("/%ff"), None);
    }
}
