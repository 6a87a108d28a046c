//! Text helpers shared by the domain and the orchestrator.

/// Shorten `s` to at most `max_chars` characters, ending in `...` when cut.
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some(_) => {
            let keep = max_chars.saturating_sub(3);
            let end = s.char_indices().nth(keep).map_or(s.len(), |(i, _)| i);
            format!("{}...", &s[..end])
        }
    }
}

/// Case-insensitive "fuzzy" name match used to resolve participant names
/// written by models (`"the skeptic"` resolves to `"Skeptic"`).
pub fn names_match(candidate: &str, known: &str) -> bool {
    let candidate = candidate.trim().to_lowercase();
    let known = known.trim().to_lowercase();
    if candidate.is_empty() || known.is_empty() {
        return false;
    }
    candidate == known || known.contains(&candidate) || candidate.contains(&known)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("motion", 6), "motion");
        assert_eq!(truncate("motion carried", 9), "motion...");
        assert_eq!(truncate("débat ouvert", 8), "débat...");
        assert_eq!(truncate("議会の決議", 5), "議会の決議");
    }

    #[test]
    fn test_names_match() {
        assert!(names_match("Skeptic", "skeptic"));
        assert!(names_match("the skeptic", "Skeptic"));
        assert!(names_match("Tech", "Technocrat"));
        assert!(!names_match("", "Skeptic"));
        assert!(!names_match("Ethicist", "Skeptic"));
    }
}
