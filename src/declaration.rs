//! Declaration printer
//!
//! Prints IR back in the helper-call form authors write, e.g.
//! `figma.enum("Size", { Large: "lg", Small: "sm" })`. Used when creating new
//! connection files; the output parses back to the same IR.

use lazy_static::lazy_static;
use regex::Regex;

use crate::codegen::escape_js_string;
use crate::intrinsics::INTRINSICS;
use crate::ir::{
    format_number, ClassNamePart, Intrinsic, Literal, PropMapping, Snippet, ValueMapping,
    ValueMappingKind,
};

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();
}

pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

fn call_name(node: &Intrinsic) -> &'static str {
    let kind = node.kind();
    INTRINSICS
        .iter()
        .find(|entry| entry.kind == kind)
        .map(|entry| entry.name)
        .unwrap_or_default()
}

pub fn quoted(s: &str) -> String {
    format!("\"{}\"", escape_js_string(s, '"'))
}

fn key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        quoted(name)
    }
}

/// Prints one intrinsic as a helper call.
pub fn print_intrinsic(node: &Intrinsic) -> String {
    let name = call_name(node);
    match node {
        Intrinsic::Boolean(args) => match &args.value_mapping {
            Some(mapping) => format!(
                "{}({}, {})",
                name,
                quoted(&args.figma_prop_name),
                print_value_mapping(mapping)
            ),
            None => format!("{}({})", name, quoted(&args.figma_prop_name)),
        },
        Intrinsic::Enum(args) => format!(
            "{}({}, {})",
            name,
            quoted(&args.figma_prop_name),
            print_value_mapping(&args.value_mapping)
        ),
        Intrinsic::String(args) | Intrinsic::Instance(args) => {
            format!("{}({})", name, quoted(&args.figma_prop_name))
        }
        Intrinsic::Children(args) => match args.layers.as_slice() {
            [single] => format!("{}({})", name, quoted(single)),
            layers => format!(
                "{}([{}])",
                name,
                layers.iter().map(|l| quoted(l)).collect::<Vec<_>>().join(", ")
            ),
        },
        Intrinsic::NestedProps(args) => format!(
            "{}({}, {})",
            name,
            quoted(&args.layer),
            print_inline_props(&args.props)
        ),
        Intrinsic::ClassName(args) => {
            let parts: Vec<String> = args
                .class_name
                .iter()
                .map(|part| match part {
                    ClassNamePart::Literal(s) => quoted(s),
                    ClassNamePart::Intrinsic(inner) => print_intrinsic(inner),
                })
                .collect();
            format!("{}([{}])", name, parts.join(", "))
        }
        Intrinsic::TextContent(args) => format!("{}({})", name, quoted(&args.layer)),
    }
}

pub fn print_value_mapping(mapping: &ValueMapping) -> String {
    if mapping.is_empty() {
        return "{}".to_string();
    }
    let entries: Vec<String> = mapping
        .iter()
        .map(|(k, v)| {
            let value = match v {
                ValueMappingKind::Intrinsic(node) => print_intrinsic(node),
                ValueMappingKind::Literal(literal) => print_literal(literal),
            };
            format!("{}: {}", key(k), value)
        })
        .collect();
    format!("{{ {} }}", entries.join(", "))
}

fn print_inline_props(props: &PropMapping) -> String {
    if props.is_empty() {
        return "{}".to_string();
    }
    let entries: Vec<String> = props
        .iter()
        .map(|(k, node)| format!("{}: {}", key(k), print_intrinsic(node)))
        .collect();
    format!("{{ {} }}", entries.join(", "))
}

/// Prints a prop mapping one entry per line, closing brace at `indent` spaces.
pub fn print_prop_mapping(props: &PropMapping, indent: usize) -> String {
    if props.is_empty() {
        return "{}".to_string();
    }
    let pad = " ".repeat(indent + 2);
    let mut out = String::from("{\n");
    for (k, node) in props {
        out.push_str(&format!("{}{}: {},\n", pad, key(k), print_intrinsic(node)));
    }
    out.push_str(&" ".repeat(indent));
    out.push('}');
    out
}

pub fn print_literal(literal: &Literal) -> String {
    match literal {
        Literal::Boolean(b) => b.to_string(),
        Literal::Number(n) => format_number(*n),
        Literal::Undefined => "undefined".to_string(),
        Literal::String(s) => quoted(s),
        Literal::Snippet(Snippet::TemplateString(text)) => format!("`{}`", text),
        Literal::Snippet(snippet) => snippet.text().to_string(),
    }
}
