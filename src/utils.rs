use std::path::Path;

/// Make an uploaded filename safe to use locally.
///
/// Path separators and whitespace become `_`, anything outside ASCII
/// letters, digits, `_`, `.` and `-` is dropped, and leading or trailing
/// `.`/`_` are stripped. The suffix survives, so extension dispatch still
/// works on the result.
pub fn secure_filename(filename: &str) -> String {
    let spaced: String = filename
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Filename component of a path, sanitised
pub fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|name| secure_filename(&name.to_string_lossy()))
        .unwrap_or_default()
}
