//! Upload filename rules.
//!
//! Client-supplied names are sanitised to a conservative ASCII subset and
//! collisions are resolved by appending a parenthesised counter before the
//! extension: `beach.png`, `beach(1).png`, `beach(2).png`, ...

use crate::error::CoreError;

/// Lower-case extensions accepted on upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// Whether `filename` ends in one of [`ALLOWED_EXTENSIONS`] (case-insensitive).
pub fn is_supported_image(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Reduce a client-supplied filename to `[A-Za-z0-9._-]`.
///
/// Path separators and whitespace runs become single underscores, other
/// characters are dropped, and leading/trailing dots and underscores are
/// stripped. The result may be empty.
///
/// ```
/// use slidekiosk_core::naming::sanitize_filename;
///
/// assert_eq!(sanitize_filename("My Holiday.JPG"), "My_Holiday.JPG");
/// assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
/// ```
pub fn sanitize_filename(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Split `name` into `(stem, extension_with_dot)`.
///
/// A leading dot is part of the stem, matching how hidden files are treated.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// The `counter`-th collision candidate for `name`: `stem(counter).ext`.
pub fn collision_candidate(name: &str, counter: u32) -> String {
    let (stem, ext) = split_extension(name);
    format!("{stem}({counter}){ext}")
}

/// Validate a filename received as a path parameter or in a JSON list.
///
/// Stored names never contain separators or parent references; anything
/// that does is rejected before it reaches the filesystem.
pub fn validate_stored_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(CoreError::Validation(format!("invalid filename '{name}'")));
    }
    if name.contains('/') || name.contains('\\') || name.contains('\0') {
        return Err(CoreError::Validation(format!(
            "filename must not contain path separators: '{name}'"
        )));
    }
    Ok(())
}
