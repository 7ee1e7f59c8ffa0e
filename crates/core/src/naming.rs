//! File name and content-type rules for uploads and downloads.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Extension (without the dot) accepted on upload.
pub const INPUT_EXTENSION: &str = "mkv";

/// Extension (without the dot) of the converted file.
pub const OUTPUT_EXTENSION: &str = "mp4";

/// Content-Type of the converted file.
pub const OUTPUT_CONTENT_TYPE: &str = "video/mp4";

/// Strip any directory components a client put in the declared filename.
/// Handles both `/` and `\` separators.
pub fn base_name(file_name: &str) -> &str {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
}

/// Whether `file_name` ends in `.mkv` (case-insensitive).
pub fn has_input_extension(file_name: &str) -> bool {
    match base_name(file_name).rsplit_once('.') {
        Some((_, ext)) => ext.eq_ignore_ascii_case(INPUT_EXTENSION),
        None => false,
    }
}

/// Replace the last extension of `file_name` with `.mp4`.
///
/// Everything before the last `.` is kept as-is; a name without a `.` gets
/// the extension appended.
pub fn output_file_name(file_name: &str) -> String {
    let name = base_name(file_name);
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => name,
    };
    format!("{stem}.{OUTPUT_EXTENSION}")
}

/// Characters allowed unescaped in an RFC 5987 `ext-value` (`attr-char`).
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// `Content-Disposition` value offering `file_name` as a download.
///
/// `filename*` carries the exact name, UTF-8 and percent-encoded. The plain
/// `filename` is an ASCII fallback for old clients, with anything else (and
/// the quoting characters) replaced by `_`.
pub fn attachment_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    let encoded = utf8_percent_encode(file_name, ATTR_CHAR);
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}
