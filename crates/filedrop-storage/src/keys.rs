//! Shared key and header generation for storage backends.
//!
//! Key format: `{prefix}/{uuid}.{ext}`, or `{prefix}/{uuid}` when the filename has no
//! usable extension.

use uuid::Uuid;

/// Extension of `filename` as written: the text after the last `.` of its final
/// path segment. Returns `None` when there is no dot, nothing after it, or the
/// extension contains anything other than ASCII letters and digits.
pub fn file_extension(filename: &str) -> Option<String> {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (_, ext) = base.rsplit_once('.')?;

    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(ext.to_string())
}

/// Generate a fresh storage key for `filename` under `prefix`.
pub fn generate_storage_key(prefix: &str, filename: &str) -> String {
    let id = Uuid::new_v4();
    let prefix = prefix.trim_matches('/');

    match file_extension(filename) {
        Some(ext) => format!("{}/{}.{}", prefix, id, ext),
        None => format!("{}/{}", prefix, id),
    }
}

/// Build an inline `Content-Disposition` value for `filename`.
///
/// The quoted `filename` parameter only carries printable ASCII; quotes, backslashes,
/// control characters and non-ASCII characters are replaced with `_`. When the name
/// is not pure ASCII an RFC 5987 `filename*` parameter carries the exact name.
pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if filename.is_ascii() {
        format!("inline; filename=\"{}\"", fallback)
    } else {
        format!(
            "inline; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            urlencoding::encode(filename)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_keeps_extension_as_written() {
        let key = generate_storage_key("uploads", "Report.PDF");
        assert!(key.starts_with("uploads/"));
        assert!(key.ends_with(".PDF"));

        let id = key
            .trim_start_matches("uploads/")
            .trim_end_matches(".PDF");
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_key_without_extension_has_no_trailing_dot() {
        let key = generate_storage_key("uploads", "README");
        assert!(!key.contains('.'));
        assert!(Uuid::parse_str(key.trim_start_matches("uploads/")).is_ok());

        let key = generate_storage_key("uploads", "archive.");
        assert!(!key.ends_with('.'));
    }

    #[test]
    fn test_key_uses_last_extension() {
        assert_eq!(file_extension("backup.tar.gz"), Some("gz".to_string()));
        assert_eq!(file_extension(".env"), Some("env".to_string()));
    }

    #[test]
    fn test_extension_cannot_escape_prefix() {
        assert_eq!(file_extension("evil./../../etc/passwd"), None);
        assert_eq!(file_extension("dir.d/notes"), None);
        assert_eq!(file_extension("photo.jp g"), None);
        assert!(!generate_storage_key("uploads", "x./../y").contains(".."));
    }

    #[test]
    fn test_keys_are_unique() {
        let a = generate_storage_key("uploads", "a.txt");
        let b = generate_storage_key("uploads", "a.txt");
        assert_ne!(a, b);
    }

    #[test]
    fn test_prefix_slashes_are_trimmed() {
        let key = generate_storage_key("/incoming/", "a.txt");
        assert!(key.starts_with("incoming/"));
        assert!(!key.contains("//"));
    }

    #[test]
    fn test_content_disposition_ascii() {
        assert_eq!(
            content_disposition("report.pdf"),
            "inline; filename=\"report.pdf\""
        );
    }

    #[test]
    fn test_content_disposition_sanitizes_quotes_and_controls() {
        assert_eq!(
            content_disposition("a\"b\\c\r\nd.txt"),
            "inline; filename=\"a_b_c__d.txt\""
        );
    }

    #[test]
    fn test_content_disposition_non_ascii() {
        let value = content_disposition("résumé.pdf");
        assert!(value.starts_with("inline; filename=\"r_sum_.pdf\""));
        assert!(value.ends_with("filename*=UTF-8''r%C3%A9sum%C3%A9.pdf"));
    }
}
