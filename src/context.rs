use oxc_span::Span;

use crate::error::{ParseErrorKind, ParserError, SourceLocation};

/// Source text and file name shared by every parse function working on one file.
///
/// `base_offset` is the number of bytes a caller prepended to line 1 before
/// handing the text to oxc; reported columns on that line are shifted back.
pub struct ParserContext<'s> {
    pub source_text: &'s str,
    pub file_path: &'s str,
    pub base_offset: u32,
}

impl<'s> ParserContext<'s> {
    pub fn new(source_text: &'s str, file_path: &'s str) -> Self {
        Self {
            source_text,
            file_path,
            base_offset: 0,
        }
    }

    pub fn with_base_offset(mut self, base_offset: u32) -> Self {
        self.base_offset = base_offset;
        self
    }

    pub fn node_text(&self, span: Span) -> &'s str {
        self.source_text
            .get(span.start as usize..span.end as usize)
            .unwrap_or_default()
    }

    pub fn location(&self, offset: u32) -> SourceLocation {
        let end = (offset as usize).min(self.source_text.len());
        let prefix = self.source_text.get(..end).unwrap_or(self.source_text);
        let line = prefix.matches('\n').count() as u32 + 1;
        let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let mut column = prefix[line_start..].chars().count() as u32 + 1;
        if line == 1 {
            column = column.saturating_sub(self.base_offset).max(1);
        }
        SourceLocation { line, column }
    }

    pub fn error(&self, kind: ParseErrorKind, message: impl Into<String>, span: Span) -> ParserError {
        let text = self.node_text(span);
        ParserError::new(
            kind,
            message,
            self.file_path,
            self.location(span.start),
            if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            },
        )
    }

    /// Syntax error at a byte offset reported by the parser.
    pub fn syntax_error(&self, message: impl Into<String>, offset: u32) -> ParserError {
        ParserError::new(
            ParseErrorKind::Syntax,
            message,
            self.file_path,
            self.location(offset),
            None,
        )
    }

    pub fn invalid_argument(&self, message: impl Into<String>, span: Span) -> ParserError {
        self.error(ParseErrorKind::InvalidArgument, message, span)
    }
}
