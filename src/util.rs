// src/util.rs — Shared utility functions

/// Shorten `s` to at most `max_chars` characters for logs and listings,
/// appending `...` when something was cut.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat = s.replace('\n', " ");
    match flat.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &flat[..end]),
        None => flat,
    }
}
