//! Markdown Section Parser (AST-based)
//!
//! Splits an issue body into its ordered top-level blocks using the
//! pulldown-cmark event stream. Heading and paragraph text is taken from the
//! raw source span of their inline content, so inline markup such as code
//! spans keeps its backticks: the heading `Output of `react-native info``
//! yields exactly that string.
//!
//! Parsing never fails. Unterminated fences, stray markers and other
//! malformed input are handled the way CommonMark handles them.

use crate::models::Section;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::ops::Range;

/// Parse a markdown document into its top-level sections, in document order
pub fn parse_sections(content: &str) -> Vec<Section> {
    let content = normalize_content(content);

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(&content, options);
    let mut sections = Vec::new();
    let mut current: Option<BlockBuilder> = None;
    let mut depth = 0usize;

    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(tag) => {
                if let Some(block) = current.as_mut() {
                    block.observe_start(range);
                } else {
                    current = Some(BlockBuilder::open(&tag));
                }
                depth += 1;
            }
            Event::End(tag_end) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some(block) = current.take() {
                        sections.push(block.finish(&content));
                    }
                } else if let Some(block) = current.as_mut() {
                    block.observe_end(&tag_end, range);
                }
            }
            Event::Rule if current.is_none() => sections.push(Section::Rule),
            other => {
                if let Some(block) = current.as_mut() {
                    block.observe_inline(&other, range, &content);
                }
            }
        }
    }

    if let Some(block) = current.take() {
        sections.push(block.finish(&content));
    }

    sections
}

/// Strip a UTF-8 BOM and normalize line endings (CRLF/CR -> LF)
///
/// Issue bodies submitted through the GitHub web UI use CRLF line endings.
pub fn normalize_content(content: &str) -> String {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    content.replace("\r\n", "\n").replace('\r', "\n")
}

#[derive(Debug)]
enum BlockKind {
    Heading(u8),
    Paragraph,
    Code(String),
    BlockQuote,
    Html,
    List,
    Table,
    Other,
}

/// Accumulates one top-level block while its events stream by
#[derive(Debug)]
struct BlockBuilder {
    kind: BlockKind,
    /// Source span of the inline content (headings and paragraphs)
    span: Option<Range<usize>>,
    /// Collected text (code, html and block quotes)
    buffer: String,
}

impl BlockBuilder {
    fn open(tag: &Tag<'_>) -> Self {
        let kind = match tag {
            Tag::Heading { level, .. } => BlockKind::Heading(heading_level(*level)),
            Tag::Paragraph => BlockKind::Paragraph,
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => BlockKind::Code(info.to_string()),
            Tag::CodeBlock(CodeBlockKind::Indented) => BlockKind::Code(String::new()),
            Tag::BlockQuote(_) => BlockKind::BlockQuote,
            Tag::HtmlBlock => BlockKind::Html,
            Tag::List(_) => BlockKind::List,
            Tag::Table(_) => BlockKind::Table,
            _ => BlockKind::Other,
        };

        Self {
            kind,
            span: None,
            buffer: String::new(),
        }
    }

    fn uses_span(&self) -> bool {
        matches!(self.kind, BlockKind::Heading(_) | BlockKind::Paragraph)
    }

    fn extend_span(&mut self, range: Range<usize>) {
        self.span = Some(match self.span.take() {
            Some(span) => span.start.min(range.start)..span.end.max(range.end),
            None => range,
        });
    }

    fn observe_start(&mut self, range: Range<usize>) {
        if self.uses_span() {
            self.extend_span(range);
        }
    }

    fn observe_end(&mut self, tag_end: &TagEnd, range: Range<usize>) {
        if self.uses_span() {
            self.extend_span(range);
            return;
        }

        // Separate the paragraphs of a block quote
        if matches!(self.kind, BlockKind::BlockQuote)
            && matches!(
                tag_end,
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::CodeBlock
            )
            && !self.buffer.is_empty()
            && !self.buffer.ends_with('\n')
        {
            self.buffer.push('\n');
        }
    }

    fn observe_inline(&mut self, event: &Event<'_>, range: Range<usize>, source: &str) {
        if self.uses_span() {
            self.extend_span(range);
            return;
        }

        match (&self.kind, event) {
            (BlockKind::Code(_), Event::Text(text)) => self.buffer.push_str(text),
            (BlockKind::Html, Event::Html(html) | Event::Text(html)) => {
                self.buffer.push_str(html)
            }
            (BlockKind::BlockQuote, Event::SoftBreak | Event::HardBreak) => self.buffer.push('\n'),
            (
                BlockKind::BlockQuote,
                Event::Text(_) | Event::Code(_) | Event::InlineHtml(_) | Event::Html(_),
            ) => {
                if let Some(raw) = source.get(range) {
                    self.buffer.push_str(raw);
                }
            }
            _ => {}
        }
    }

    fn finish(self, source: &str) -> Section {
        let span_text = || {
            self.span
                .clone()
                .and_then(|span| source.get(span))
                .map(|text| text.trim().to_string())
                .unwrap_or_default()
        };

        match self.kind {
            BlockKind::Heading(level) => Section::Heading {
                level,
                text: span_text(),
            },
            BlockKind::Paragraph => Section::Paragraph { text: span_text() },
            BlockKind::Code(info) => Section::Code {
                info,
                text: self.buffer.trim_end_matches('\n').to_string(),
            },
            BlockKind::BlockQuote => Section::BlockQuote {
                text: self.buffer.trim().to_string(),
            },
            BlockKind::Html => Section::Html {
                text: self.buffer.trim_end_matches('\n').to_string(),
            },
            BlockKind::List => Section::List,
            BlockKind::Table => Section::Table,
            BlockKind::Other => Section::Other,
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(level: u8, text: &str) -> Section {
        Section::Heading {
            level,
            text: text.to_string(),
        }
    }

    fn paragraph(text: &str) -> Section {
        Section::Paragraph {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_heading_followed_by_paragraph() {
        let sections = parse_sections("## Version\n\n1.5.0\n");
        assert_eq!(sections, vec![heading(2, "Version"), paragraph("1.5.0")]);
    }

    #[test]
    fn test_heading_keeps_code_span_backticks() {
        let sections = parse_sections("### Output of `react-native info`\n\nhello");
        assert_eq!(sections[0], heading(3, "Output of `react-native info`"));
    }

    #[test]
    fn test_heading_closing_hashes_are_dropped() {
        let sections = parse_sections("## New Version ##\n");
        assert_eq!(sections, vec![heading(2, "New Version")]);
    }

    #[test]
    fn test_setext_heading() {
        let sections = parse_sections("Version\n-------\n\n0.72.1\n");
        assert_eq!(sections, vec![heading(2, "Version"), paragraph("0.72.1")]);
    }

    #[test]
    fn test_paragraph_keeps_inline_markup() {
        let sections = parse_sections("**1.2.3**\n");
        assert_eq!(sections, vec![paragraph("**1.2.3**")]);
    }

    #[test]
    fn test_multiline_paragraph() {
        let sections = parse_sections("first line\nsecond line\n");
        assert_eq!(sections, vec![paragraph("first line\nsecond line")]);
    }

    #[test]
    fn test_fenced_code_block() {
        let body = "```text\nSystem:\n  OS: macOS\nnpmPackages:\n  react-native: 0.71.0 => 0.71.0\n```\n";
        let sections = parse_sections(body);
        assert_eq!(
            sections,
            vec![Section::Code {
                info: "text".to_string(),
                text: "System:\n  OS: macOS\nnpmPackages:\n  react-native: 0.71.0 => 0.71.0"
                    .to_string(),
            }]
        );
    }

    #[test]
    fn test_indented_code_block() {
        let sections = parse_sections("    react-native: 0.70.0 => 0.70.0\n");
        assert_eq!(
            sections,
            vec![Section::Code {
                info: String::new(),
                text: "react-native: 0.70.0 => 0.70.0".to_string(),
            }]
        );
    }

    #[test]
    fn test_structural_blocks_keep_their_position() {
        let body = "## Version\n\n- one\n- two\n\n---\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n1.0.0\n";
        let sections = parse_sections(body);
        assert_eq!(
            sections,
            vec![
                heading(2, "Version"),
                Section::List,
                Section::Rule,
                Section::Table,
                paragraph("1.0.0"),
            ]
        );
    }

    #[test]
    fn test_nested_blocks_do_not_become_sections() {
        let sections = parse_sections("- ## Version\n- 1.0.0\n");
        assert_eq!(sections, vec![Section::List]);
    }

    #[test]
    fn test_block_quote_text() {
        let sections = parse_sections("> quoted `code`\n> more\n>\n> second\n");
        assert_eq!(
            sections,
            vec![Section::BlockQuote {
                text: "quoted `code`\nmore\nsecond".to_string(),
            }]
        );
    }

    #[test]
    fn test_html_block() {
        let sections = parse_sections("<!-- Please fill in the version -->\n\n## Version\n");
        assert_eq!(
            sections,
            vec![
                Section::Html {
                    text: "<!-- Please fill in the version -->".to_string(),
                },
                heading(2, "Version"),
            ]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let sections = parse_sections("### Version\r\n\r\n0.73.0\r\n");
        assert_eq!(sections, vec![heading(3, "Version"), paragraph("0.73.0")]);
    }

    #[test]
    fn test_unterminated_fence_degrades_gracefully() {
        let sections = parse_sections("## Version\n\n```\n1.0.0\n");
        assert_eq!(
            sections,
            vec![
                heading(2, "Version"),
                Section::Code {
                    info: String::new(),
                    text: "1.0.0".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_sections("").is_empty());
        assert!(parse_sections("\n\n   \n").is_empty());
    }

    #[test]
    fn test_normalize_content_strips_bom() {
        assert_eq!(normalize_content("\u{FEFF}a\r\nb\rc"), "a\nb\nc");
    }
}
