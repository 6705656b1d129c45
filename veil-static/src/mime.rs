//! MIME type handling

/// Get MIME type for a file path
pub fn guess_mime_type(path: &str) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
}

/// `Content-Type` header value for a file path; text types carry a UTF-8 charset
pub fn content_type(path: &str) -> String {
    let mime = guess_mime_type(path);
    if mime.starts_with("text/") {
        format!("{}; charset=utf-8", mime)
    } else {
        mime.to_string()
    }
}
