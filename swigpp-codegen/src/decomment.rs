// Comment stripping applied to interface files before line classification.

use std::path::Path;

use crate::error::{Result, SwigppError};

/// Read a file and return its lines with comments removed.
pub fn read_uncommented_lines(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(SwigppError::io(path))?;
    Ok(strip_comments(&text))
}

/// Remove `/* ... */` block comments (which may span lines) and trailing `//` comments.
///
/// A line a block comment opened, closed or passed through is dropped when nothing
/// outside the comment remains; every other line is kept, even if it is blank.
/// Line-comment markers inside double-quoted strings are left alone.
pub fn strip_comments(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut in_block = false;

    for raw in text.lines() {
        let mut kept = String::new();
        let mut rest = raw;
        let mut in_comment = in_block;

        loop {
            if in_block {
                match rest.find("*/") {
                    Some(end) => {
                        rest = &rest[end + 2..];
                        in_block = false;
                    }
                    None => {
                        rest = "";
                        break;
                    }
                }
            } else {
                let line_comment = line_comment_start(rest);
                match rest.find("/*") {
                    Some(start) if line_comment.is_none_or(|cut| start < cut) => {
                        kept.push_str(&rest[..start]);
                        rest = &rest[start + 2..];
                        in_block = true;
                        in_comment = true;
                    }
                    _ => break,
                }
            }
        }
        kept.push_str(rest);

        if in_comment && kept.is_empty() {
            continue;
        }
        out.push(strip_line_comment(&kept).to_string());
    }

    out
}

/// Cut a line at its first `//` that is not inside a string literal.
fn strip_line_comment(line: &str) -> &str {
    match line_comment_start(line) {
        Some(cut) => &line[..cut],
        None => line,
    }
}

fn line_comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}
