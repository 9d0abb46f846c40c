//! Intrinsic IR
//!
//! Canonical, serializable representation of the `figma.*` helper calls found in
//! connection declarations. Every node is an owned tree; the same JSON shape is
//! exchanged with parser executables and persisted in connection payloads.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Namespace every helper call is qualified with.
pub const API_PREFIX: &str = "figma";

/// Qualified name of the connection declaration call.
pub const FIGMA_CONNECT_CALL: &str = "figma.connect";

// ═══════════════════════════════════════════════════════════════════════════════
// INTRINSIC KINDS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Boolean,
    Enum,
    String,
    Instance,
    Children,
    NestedProps,
    ClassName,
    TextContent,
}

impl IntrinsicKind {
    /// Wire name of the kind; also the `__properties__` accessor for lookups.
    pub fn as_str(self) -> &'static str {
        match self {
            IntrinsicKind::Boolean => "boolean",
            IntrinsicKind::Enum => "enum",
            IntrinsicKind::String => "string",
            IntrinsicKind::Instance => "instance",
            IntrinsicKind::Children => "children",
            IntrinsicKind::NestedProps => "nested-props",
            IntrinsicKind::ClassName => "className",
            IntrinsicKind::TextContent => "text-content",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// INTRINSIC NODES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "args")]
pub enum Intrinsic {
    #[serde(rename = "boolean")]
    Boolean(BooleanArgs),
    #[serde(rename = "enum")]
    Enum(EnumArgs),
    #[serde(rename = "string")]
    String(PropNameArgs),
    #[serde(rename = "instance")]
    Instance(PropNameArgs),
    #[serde(rename = "children")]
    Children(ChildrenArgs),
    #[serde(rename = "nested-props")]
    NestedProps(NestedPropsArgs),
    #[serde(rename = "className")]
    ClassName(ClassNameArgs),
    #[serde(rename = "text-content")]
    TextContent(TextContentArgs),
}

impl Intrinsic {
    pub fn kind(&self) -> IntrinsicKind {
        match self {
            Intrinsic::Boolean(_) => IntrinsicKind::Boolean,
            Intrinsic::Enum(_) => IntrinsicKind::Enum,
            Intrinsic::String(_) => IntrinsicKind::String,
            Intrinsic::Instance(_) => IntrinsicKind::Instance,
            Intrinsic::Children(_) => IntrinsicKind::Children,
            Intrinsic::NestedProps(_) => IntrinsicKind::NestedProps,
            Intrinsic::ClassName(_) => IntrinsicKind::ClassName,
            Intrinsic::TextContent(_) => IntrinsicKind::TextContent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanArgs {
    pub figma_prop_name: String,
    /// Keys are restricted to `"true"` and `"false"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_mapping: Option<ValueMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumArgs {
    pub figma_prop_name: String,
    pub value_mapping: ValueMapping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropNameArgs {
    pub figma_prop_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildrenArgs {
    pub layers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedPropsArgs {
    pub layer: String,
    pub props: PropMapping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassNameArgs {
    pub class_name: Vec<ClassNamePart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassNamePart {
    Literal(String),
    Intrinsic(Intrinsic),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContentArgs {
    pub layer: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// VALUE MAPPINGS & LITERALS
// ═══════════════════════════════════════════════════════════════════════════════

/// Ordered name → intrinsic mapping for one component connection.
pub type PropMapping = IndexMap<String, Intrinsic>;

/// Ordered design value → code value mapping used by `enum` and `boolean`.
pub type ValueMapping = IndexMap<String, ValueMappingKind>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueMappingKind {
    Intrinsic(Intrinsic),
    Literal(Literal),
}

/// A code value captured from source. `Undefined` travels as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Snippet(Snippet),
    Boolean(bool),
    Number(f64),
    String(String),
    Undefined,
}

/// Source text kept verbatim, tagged with how it is reconstructed at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Snippet {
    Function(String),
    Identifier(String),
    Object(String),
    TemplateString(String),
    JsxElement(String),
}

impl Snippet {
    pub fn text(&self) -> &str {
        match self {
            Snippet::Function(s)
            | Snippet::Identifier(s)
            | Snippet::Object(s)
            | Snippet::TemplateString(s)
            | Snippet::JsxElement(s) => s,
        }
    }
}

/// Formats a number the way JavaScript prints it for the common cases.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}
