//! Wire types exchanged with parser executables.
//!
//! One JSON document per request on stdin, one per response on stdout. Unknown
//! fields are ignored on input; missing required fields fail deserialization.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::CodeConnectConfig;
use crate::ir::{PropMapping, ValueMapping};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestMode {
    Parse,
    Create,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequestPayload {
    pub mode: RequestMode,
    pub paths: Vec<String>,
    #[serde(default)]
    pub options: ParseOptions,
    pub config: CodeConnectConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOptions {
    #[serde(default)]
    pub auto_add_imports: bool,
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponsePayload {
    pub docs: Vec<CodeConnectJson>,
    pub messages: Vec<ParserMessage>,
}

/// One parsed connection, ready to be published next to the design node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeConnectJson {
    pub figma_node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<ValueMapping>,
    pub source: String,
    #[serde(default)]
    pub source_location: SourceLine,
    pub template: String,
    #[serde(default)]
    pub template_data: TemplateData,
    pub language: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLine {
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<PropMapping>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// CREATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Design-side description of the component a file is created for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    pub figma_node_url: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_property_definitions: Option<IndexMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaConnection {
    pub source_export: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop_mapping: Option<PropMapping>,
    #[serde(
        default,
        alias = "reactTypeSignature",
        skip_serializing_if = "Option::is_none"
    )]
    pub type_signature: Option<IndexMap<String, String>>,
    pub component: ComponentDescriptor,
}

/// CREATE for ecosystems with one export per file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestPayload {
    pub mode: RequestMode,
    pub destination_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_filepath: Option<String>,
    pub component: ComponentDescriptor,
    pub config: CodeConnectConfig,
}

/// CREATE merging several design nodes that target exports of one source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestPayloadMulti {
    pub mode: RequestMode,
    pub destination_dir: String,
    pub source_filepath: String,
    pub normalized_name: String,
    pub figma_connections: Vec<FigmaConnection>,
    pub config: CodeConnectConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatePayload {
    Multi(CreateRequestPayloadMulti),
    Single(CreateRequestPayload),
}

impl CreatePayload {
    pub fn destination_dir(&self) -> &str {
        match self {
            CreatePayload::Multi(p) => &p.destination_dir,
            CreatePayload::Single(p) => &p.destination_dir,
        }
    }

    pub fn config(&self) -> &CodeConnectConfig {
        match self {
            CreatePayload::Multi(p) => &p.config,
            CreatePayload::Single(p) => &p.config,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponsePayload {
    pub created_files: Vec<CreatedFile>,
    pub messages: Vec<ParserMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedFile {
    pub file_path: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// MESSAGES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    #[serde(alias = "DEBUG", alias = "debug", alias = "INFO")]
    Info,
    #[serde(alias = "WARN", alias = "warn", alias = "WARNING")]
    Warning,
    #[serde(alias = "ERROR")]
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserMessage {
    pub level: MessageLevel,
    #[serde(alias = "message")]
    pub text: String,
}

impl ParserMessage {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            text: text.into(),
        }
    }
}
