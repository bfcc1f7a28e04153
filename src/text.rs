//! Line splitting for fixture text and captured output

/// Split `text` into lines, treating `\r\n`, `\r` and `\n` as terminators.
///
/// A trailing terminator does not produce an empty final line, and an empty
/// input has no lines.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some(idx) = rest.find(['\r', '\n']) else {
            let line = rest;
            rest = "";
            return Some(line);
        };
        let line = &rest[..idx];
        let terminator = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[idx + terminator..];
        Some(line)
    })
}
