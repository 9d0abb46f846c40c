use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_INVALID_ARGUMENT: &str = "FCC-PARSE-001";
pub const ERR_UNKNOWN_INTRINSIC: &str = "FCC-PARSE-002";
pub const ERR_WILDCARD_IN_ARRAY: &str = "FCC-PARSE-003";
pub const ERR_DUPLICATE_KEY: &str = "FCC-PARSE-004";
pub const ERR_SYNTAX: &str = "FCC-PARSE-005";

fn get_hint(code: &str) -> &'static str {
    match code {
        ERR_INVALID_ARGUMENT => "Helper arguments must be literals written inline in the call.",
        ERR_UNKNOWN_INTRINSIC => {
            "Only figma.boolean, figma.enum, figma.string, figma.instance, figma.children, \
             figma.nestedProps, figma.className and figma.textContent are understood."
        }
        ERR_WILDCARD_IN_ARRAY => {
            "Wildcards can not be used with an array of strings. Use a single string literal instead."
        }
        ERR_DUPLICATE_KEY => "Each key of a prop or value mapping may appear only once.",
        ERR_SYNTAX => "The file could not be parsed as TypeScript/JSX.",
        _ => "",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SOURCE LOCATION
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSER ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseErrorKind {
    InvalidArgument,
    UnknownIntrinsic,
    UnsupportedWildcardInArray,
    DuplicateKey,
    Syntax,
}

impl ParseErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ParseErrorKind::InvalidArgument => ERR_INVALID_ARGUMENT,
            ParseErrorKind::UnknownIntrinsic => ERR_UNKNOWN_INTRINSIC,
            ParseErrorKind::UnsupportedWildcardInArray => ERR_WILDCARD_IN_ARRAY,
            ParseErrorKind::DuplicateKey => ERR_DUPLICATE_KEY,
            ParseErrorKind::Syntax => ERR_SYNTAX,
        }
    }
}

/// A rejected helper call or connection declaration, positioned in its file.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{file}:{line}:{column}: {message} [{code}]")]
pub struct ParserError {
    pub kind: ParseErrorKind,
    pub code: String,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    /// Source text of the offending node
    pub context: Option<String>,
    pub hints: Vec<String>,
}

impl ParserError {
    pub fn new(
        kind: ParseErrorKind,
        message: impl Into<String>,
        file: &str,
        location: SourceLocation,
        context: Option<String>,
    ) -> Self {
        let code = kind.code();
        let hint = get_hint(code);
        ParserError {
            kind,
            code: code.to_string(),
            message: message.into(),
            file: file.to_string(),
            line: location.line,
            column: location.column,
            context,
            hints: if hint.is_empty() {
                vec![]
            } else {
                vec![hint.to_string()]
            },
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RENDER ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error(
        "nested props must be expressed by naming the inner layer at the top level (layer `{layer}`)"
    )]
    UnsupportedInlineNesting { layer: String },
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONNECT ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error(transparent)]
    Parse(#[from] ParserError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// An unreachable branch was reached; this is a bug, not a user error.
    #[error("internal error: {0}")]
    Internal(String),

    #[error("{destination}: backend response does not match the protocol: {detail}")]
    ProtocolViolation { destination: String, detail: String },

    #[error("{destination}: backend failed: {detail}")]
    BackendFailure { destination: String, detail: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ConnectError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        ConnectError::Io {
            path: path.into(),
            source,
        }
    }
}
