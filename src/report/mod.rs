//! Report formatting
//!
//! Plain-text helpers shared by the console output and the benchmark report.

mod writer;

pub use writer::{BenchmarkRecord, ReportWriter, report_file_name};

/// Center `label` in a line of `width` characters padded with `fill`.
///
/// One space separates the label from the padding on each side. When the
/// padding is odd the extra character goes on the right. A label too wide
/// to fit is returned as is, never truncated.
pub fn cover(label: &str, width: usize, fill: char) -> String {
    let used = label.chars().count() + 2;
    let Some(padding) = width.checked_sub(used) else {
        return label.to_string();
    };
    let left = padding / 2;
    let right = left + padding % 2;
    let mut line = String::with_capacity(width + label.len());
    line.extend(std::iter::repeat_n(fill, left));
    line.push(' ');
    line.push_str(label);
    line.push(' ');
    line.extend(std::iter::repeat_n(fill, right));
    line
}

/// The first `max_chars` characters of `text`.
pub fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
