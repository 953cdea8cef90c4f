// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload filename validation and sanitization

use regex::Regex;
use std::sync::OnceLock;

/// Extensions accepted on upload (compared lowercase)
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

fn unsafe_chars() -> &'static Regex {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("static regex is valid"))
}

/// Whether `filename` has an allowed extension
///
/// The extension is everything after the last `.`, compared
/// case-insensitively. Names without a `.` are rejected.
pub fn has_allowed_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reduce a client-supplied filename to a safe flat name
///
/// Non-ASCII characters are dropped, path separators become spaces,
/// whitespace runs become `_`, anything outside `[A-Za-z0-9_.-]` is removed
/// and leading/trailing `.`/`_` are trimmed. The result may be empty.
pub fn sanitize_filename(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    unsafe_chars()
        .replace_all(&joined, "")
        .trim_matches(|c: char| c == '.' || c == '_')
        .to_string()
}

/// Stem of a stored filename (`photo.final.jpg` -> `photo.final`)
pub fn file_stem(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    }
}
