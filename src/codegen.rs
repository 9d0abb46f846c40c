//! Codegen module
//!
//! Serializes intrinsic IR back into JavaScript evaluated against the design
//! tool's current layer at inspection time. The identifiers emitted here
//! (`__properties__`, `__findChildWithCriteria__`, `_fcc_*`) are the runtime
//! contract and must not change.

use crate::error::RenderError;
use crate::ir::{
    format_number, ClassNamePart, Intrinsic, Literal, PropMapping, Snippet, ValueMapping,
    ValueMappingKind,
};

/// Selector used when the caller does not thread a closer one.
pub const CURRENT_LAYER: &str = "figma.currentLayer";

// ═══════════════════════════════════════════════════════════════════════════════
// INTRINSICS
// ═══════════════════════════════════════════════════════════════════════════════

/// Renders one intrinsic as a lookup expression against `selector`.
pub fn render_intrinsic(node: &Intrinsic, selector: Option<&str>) -> Result<String, RenderError> {
    let sel = selector.unwrap_or(CURRENT_LAYER);

    match node {
        Intrinsic::String(args) | Intrinsic::Instance(args) => Ok(format!(
            "{}.__properties__.{}('{}')",
            sel,
            node.kind().as_str(),
            escape_js_string(&args.figma_prop_name, '\'')
        )),
        Intrinsic::Boolean(args) => {
            let name = escape_js_string(&args.figma_prop_name, '\'');
            match &args.value_mapping {
                Some(mapping) => Ok(format!(
                    "{}.__properties__.boolean('{}', {})",
                    sel,
                    name,
                    render_value_mapping(mapping, Some(sel))?
                )),
                None => Ok(format!("{}.__properties__.boolean('{}')", sel, name)),
            }
        }
        Intrinsic::Enum(args) => Ok(format!(
            "{}.__properties__.enum('{}', {})",
            sel,
            escape_js_string(&args.figma_prop_name, '\''),
            render_value_mapping(&args.value_mapping, Some(sel))?
        )),
        Intrinsic::Children(args) => {
            let layers: Vec<String> = args
                .layers
                .iter()
                .map(|layer| format!("\"{}\"", escape_js_string(layer, '"')))
                .collect();
            Ok(format!(
                "{}.__properties__.children([{}])",
                sel,
                layers.join(",")
            ))
        }
        Intrinsic::ClassName(args) => {
            let mut parts = Vec::with_capacity(args.class_name.len());
            for part in &args.class_name {
                parts.push(match part {
                    ClassNamePart::Literal(s) => format!("\"{}\"", escape_js_string(s, '"')),
                    ClassNamePart::Intrinsic(inner) => render_intrinsic(inner, Some(sel))?,
                });
            }
            Ok(format!(
                "[{}].filter(v => !!v).join(' ')",
                parts.join(", ")
            ))
        }
        Intrinsic::TextContent(args) => Ok(format!(
            "{}.__findChildWithCriteria__({{ name: '{}', type: \"TEXT\" }}).textContent",
            sel,
            escape_js_string(&args.layer, '\'')
        )),
        Intrinsic::NestedProps(args) => Err(RenderError::UnsupportedInlineNesting {
            layer: args.layer.clone(),
        }),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MAPPINGS
// ═══════════════════════════════════════════════════════════════════════════════

/// Renders a value mapping as an object literal, keeping insertion order.
pub fn render_value_mapping(
    mapping: &ValueMapping,
    selector: Option<&str>,
) -> Result<String, RenderError> {
    let mut entries = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let rendered = match value {
            ValueMappingKind::Intrinsic(node) => render_intrinsic(node, selector)?,
            ValueMappingKind::Literal(literal) => render_literal(literal),
        };
        entries.push(render_entry(key, &rendered));
    }
    Ok(format!("{{\n{}}}", entries.join(",\n")))
}

/// Renders a whole prop mapping as one object literal of lookup expressions.
pub fn render_prop_mapping(
    mapping: &PropMapping,
    selector: Option<&str>,
) -> Result<String, RenderError> {
    let mut entries = Vec::with_capacity(mapping.len());
    for (key, node) in mapping {
        entries.push(render_entry(key, &render_intrinsic(node, selector)?));
    }
    Ok(format!("{{\n{}}}", entries.join(",\n")))
}

fn render_entry(key: &str, value: &str) -> String {
    format!("\"{}\": {}", escape_js_string(key, '"'), value)
}

pub fn render_literal(literal: &Literal) -> String {
    match literal {
        Literal::Boolean(b) => b.to_string(),
        Literal::Number(n) => format_number(*n),
        Literal::Undefined => "undefined".to_string(),
        Literal::String(s) => format!("'{}'", escape_js_string(s, '\'')),
        Literal::Snippet(snippet) => render_snippet(snippet),
    }
}

/// Rebuilds a verbatim snippet through its runtime helper.
pub fn render_snippet(snippet: &Snippet) -> String {
    let helper = match snippet {
        Snippet::Function(_) => "_fcc_function",
        Snippet::Identifier(_) => "_fcc_identifier",
        Snippet::Object(_) => "_fcc_object",
        Snippet::TemplateString(_) => "_fcc_templateString",
        Snippet::JsxElement(_) => "_fcc_jsxElement",
    };
    format!("{}('{}')", helper, escape_js_string(snippet.text(), '\''))
}

pub fn escape_js_string(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
