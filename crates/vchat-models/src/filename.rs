//! Upload filename validation and sanitization.

/// Video container extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm"];

/// Check whether a filename carries an allowed video extension.
pub fn has_allowed_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.iter().any(|a| *a == ext)
        })
        .unwrap_or(false)
}

/// Sanitize a client-supplied filename for use in a staging path.
///
/// Keeps ASCII alphanumerics, `.`, `_` and `-`; everything else
/// (separators included) becomes `_`. Leading dots are stripped so
/// the result can never be a hidden or relative path component.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches(['.', '_']).to_string();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        assert!(has_allowed_extension("clip.mp4"));
        assert!(has_allowed_extension("CLIP.MKV"));
        assert!(has_allowed_extension("a.b.webm"));
        assert!(!has_allowed_extension("clip.exe"));
        assert!(!has_allowed_extension("mp4"));
        assert!(!has_allowed_extension(""));
    }

    #[test]
    fn test_sanitize_plain_name() {
        assert_eq!(sanitize_filename("my video.mp4"), "my_video.mp4");
        assert_eq!(sanitize_filename("clip-01.mov"), "clip-01.mov");
    }

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("/tmp/x.mp4"), "tmp_x.mp4");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename("..."), "upload");
    }
}
