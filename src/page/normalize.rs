//! Chapter body normalization
//!
//! Raw extracted text carries layout artifacts: ideographic indent spaces,
//! runs of padding whitespace, blank separator lines, and ASCII quote
//! characters the source uses inconsistently. This pass reduces a chapter's
//! concatenated pages to clean paragraph-per-line text.

/// Normalizes a chapter body
///
/// - strips U+3000 ideographic spaces and stray backslashes
/// - collapses runs of horizontal whitespace to a single space
/// - trims each line and unifies paragraph breaks to single newlines
/// - normalizes ASCII double quotes to opening curly quotes, matching
///   the source's own convention
pub fn normalize_body(text: &str) -> String {
    let mut paragraphs = Vec::new();

    for line in text.lines() {
        let cleaned: String = line
            .chars()
            .filter(|c| *c != '\u{3000}' && *c != '\\')
            .map(|c| if c == '"' { '“' } else { c })
            .collect();

        let mut collapsed = String::with_capacity(cleaned.len());
        let mut last_was_space = false;
        for c in cleaned.trim().chars() {
            if c == ' ' || c == '\t' {
                if !last_was_space {
                    collapsed.push(' ');
                }
                last_was_space = true;
            } else {
                collapsed.push(c);
                last_was_space = false;
            }
        }

        if !collapsed.is_empty() {
            paragraphs.push(collapsed);
        }
    }

    paragraphs.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(normalize_body("Hello."), "Hello.");
    }

    #[test]
    fn test_ideographic_spaces_stripped() {
        assert_eq!(normalize_body("\u{3000}\u{3000}First."), "First.");
    }

    #[test]
    fn test_whitespace_runs_collapsed() {
        assert_eq!(normalize_body("a   b\t\tc"), "a b c");
    }

    #[test]
    fn test_blank_lines_removed() {
        assert_eq!(normalize_body("one\n\n\ntwo\n"), "one\ntwo");
    }

    #[test]
    fn test_lines_trimmed() {
        assert_eq!(normalize_body("  padded  \n next "), "padded\nnext");
    }

    #[test]
    fn test_quotes_normalized() {
        assert_eq!(normalize_body("she said \"hi\""), "she said “hi“");
    }

    #[test]
    fn test_backslashes_stripped() {
        assert_eq!(normalize_body("a\\b"), "ab");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_body(""), "");
        assert_eq!(normalize_body("\n\u{3000}\n"), "");
    }
}
