//! Small shared helpers.

/// Truncate a string to `max` characters, appending an ellipsis when
/// anything was cut. Counts chars, not bytes, so multi-byte input never
/// splits a codepoint.
pub fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }

    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }

    if max <= 3 {
        return s.chars().take(max).collect();
    }

    let truncated: String = s.chars().take(max - 3).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate("tomato", 10), "tomato");
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        assert_eq!(truncate("a very long error message", 10), "a very ...");
    }

    #[test]
    fn test_truncate_multibyte_safe() {
        let s = "héllø wörld with extra";
        let out = truncate(s, 10);
        assert_eq!(out.chars().count(), 10);
        assert!(out.ends_with("..."));
    }
}
