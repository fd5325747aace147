//! Block-level sections of a parsed issue body
//!
//! A `Section` is one top-level block of a markdown document. The order of
//! sections is significant: the version extractor looks at the block that
//! immediately follows a recognized heading, so blocks without text still
//! occupy a slot in the sequence.

use serde::Serialize;

/// One top-level block of a markdown document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    /// ATX or setext heading, text is the raw inline source without markers
    Heading { level: u8, text: String },

    /// Paragraph, text is the raw inline source
    Paragraph { text: String },

    /// Fenced or indented code block
    Code {
        /// Info string of a fenced block (empty for indented blocks)
        info: String,
        text: String,
    },

    /// Block quote, text is the inline content of its children
    BlockQuote { text: String },

    /// Raw HTML block
    Html { text: String },

    /// Ordered or unordered list
    List,

    /// GFM table
    Table,

    /// Thematic break (`---`, `***`)
    Rule,

    /// Any other structural block (footnote definitions, metadata)
    Other,
}

impl Section {
    /// Text content of the section, `None` for structural blocks and for
    /// blocks whose text is empty
    pub fn text(&self) -> Option<&str> {
        let text = match self {
            Section::Heading { text, .. }
            | Section::Paragraph { text }
            | Section::Code { text, .. }
            | Section::BlockQuote { text }
            | Section::Html { text } => text.as_str(),
            Section::List | Section::Table | Section::Rule | Section::Other => return None,
        };

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn has_text(&self) -> bool {
        self.text().is_some()
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, Section::Heading { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_sections_have_no_text() {
        assert_eq!(Section::List.text(), None);
        assert_eq!(Section::Table.text(), None);
        assert_eq!(Section::Rule.text(), None);
        assert!(!Section::Other.has_text());
    }

    #[test]
    fn test_empty_text_counts_as_no_text() {
        let section = Section::Code {
            info: "sh".to_string(),
            text: String::new(),
        };
        assert_eq!(section.text(), None);
        assert!(!section.has_text());
    }

    #[test]
    fn test_text_is_returned_verbatim() {
        let section = Section::Heading {
            level: 3,
            text: "Output of `react-native info`".to_string(),
        };
        assert_eq!(section.text(), Some("Output of `react-native info`"));
        assert!(section.is_heading());
    }
}
