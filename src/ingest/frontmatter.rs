//! Markdown front-matter removal.

const DELIMITER: &str = "---";

/// Strip a leading front-matter block from `text`.
///
/// If the text starts with `---`, the content between that delimiter and the
/// next `---` is removed and the remainder returned trimmed. When no closing
/// delimiter exists the original text is returned trimmed, so a malformed
/// header never swallows the document body. Idempotent for well-formed input.
pub fn strip_front_matter(text: &str) -> &str {
    if let Some(rest) = text.strip_prefix(DELIMITER) {
        if let Some(close) = rest.find(DELIMITER) {
            return rest[close + DELIMITER.len()..].trim();
        }
    }
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_front_matter_block() {
        let doc = "---\ntitle: Intro\nsidebar_position: 1\n---\n\n# Introduction\n\nBody text.";
        assert_eq!(strip_front_matter(doc), "# Introduction\n\nBody text.");
    }

    #[test]
    fn plain_text_is_only_trimmed() {
        let doc = "  \n# No front matter here\n\n";
        assert_eq!(strip_front_matter(doc), "# No front matter here");
    }

    #[test]
    fn unclosed_delimiter_keeps_whole_document() {
        let doc = "---\ntitle: broken\nno closing fence\nbody continues";
        assert_eq!(strip_front_matter(doc), doc.trim());
    }

    #[test]
    fn stripping_is_idempotent() {
        let doc = "---\ntitle: Intro\n---\nChapter one begins here.";
        let once = strip_front_matter(doc);
        let twice = strip_front_matter(once);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_yields_empty() {
        assert_eq!(strip_front_matter(""), "");
    }
}
