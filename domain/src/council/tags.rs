//! Minimal tag grammar for model output.
//!
//! Tags are `<name>value</name>`, matched case-insensitively. A tag that is
//! never closed runs to the next `<` (or the end of the text), so output
//! like `<vote>YEA <confidence>8</confidence>` still yields `YEA`.

/// Byte offsets of every `<name>` opening tag in `text`
pub fn tag_positions(text: &str, name: &str) -> Vec<usize> {
    let lower = text.to_ascii_lowercase();
    let open = format!("<{}>", name.to_ascii_lowercase());
    lower.match_indices(&open).map(|(i, _)| i).collect()
}

/// Value of the first `<name>` tag, trimmed
pub fn tag_value<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let positions = tag_positions(text, name);
    let start = *positions.first()?;
    Some(value_at(text, name, start))
}

/// Values of every `<name>` tag, trimmed, in order of appearance
pub fn tag_values<'a>(text: &'a str, name: &str) -> Vec<&'a str> {
    tag_positions(text, name)
        .into_iter()
        .map(|start| value_at(text, name, start))
        .collect()
}

/// Remove every `<name>...</name>` section, returning the remainder and the
/// removed inner values. An unclosed tag swallows the rest of the text.
pub fn strip_tag(text: &str, name: &str) -> (String, Vec<String>) {
    let lower = text.to_ascii_lowercase();
    let open = format!("<{}>", name.to_ascii_lowercase());
    let close = format!("</{}>", name.to_ascii_lowercase());

    let mut kept = String::with_capacity(text.len());
    let mut removed = Vec::new();
    let mut cursor = 0;

    while let Some(rel) = lower[cursor..].find(&open) {
        let open_at = cursor + rel;
        kept.push_str(&text[cursor..open_at]);
        let inner_start = open_at + open.len();
        match lower[inner_start..].find(&close) {
            Some(rel_close) => {
                removed.push(text[inner_start..inner_start + rel_close].trim().to_string());
                cursor = inner_start + rel_close + close.len();
            }
            None => {
                removed.push(text[inner_start..].trim().to_string());
                cursor = text.len();
            }
        }
    }
    kept.push_str(&text[cursor..]);
    (kept, removed)
}

fn value_at<'a>(text: &'a str, name: &str, open_at: usize) -> &'a str {
    let lower = text.to_ascii_lowercase();
    let start = open_at + name.len() + 2;
    let close = format!("</{}>", name.to_ascii_lowercase());
    let end = match lower[start..].find(&close) {
        Some(rel) => start + rel,
        None => lower[start..]
            .find('<')
            .map(|rel| start + rel)
            .unwrap_or(text.len()),
    };
    text[start..end].trim()
}
